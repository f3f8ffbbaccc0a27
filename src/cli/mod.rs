//! CLI command handlers
//!
//! A session is a sequence of lines, each parsed with clap into a
//! [`SessionCommand`] and dispatched to the service layer against one
//! shared `BankStore`.

pub mod automation;
pub mod contact;
pub mod demo;
pub mod envelope;
pub mod notification;
pub mod session;
pub mod transfer;

use clap::{Parser, Subcommand};

use crate::display::{format_balance, format_profile};
use crate::error::{BankError, BankResult};
use crate::models::{AutomationRule, Contact, Envelope, Money};
use crate::storage::BankStore;

pub use automation::{handle_automation_command, AutomationCommands};
pub use contact::{handle_contact_command, ContactCommands};
pub use demo::run_demo;
pub use envelope::{handle_envelope_command, EnvelopeCommands};
pub use notification::{handle_notification_command, NotificationCommands};
pub use session::{
    handle_biometric_command, handle_login_command, run_session, LoginArgs, SessionMode,
};
pub use transfer::{
    handle_history_command, handle_recharge_command, handle_transfer_command, RechargeArgs,
    TransferArgs,
};

/// One line of a session
#[derive(Parser, Debug)]
#[command(name = "billetera", no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Commands available inside a session
#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Show the account balance
    #[command(alias = "saldo")]
    Balance,

    /// Contact directory commands
    #[command(subcommand)]
    Contact(ContactCommands),

    /// Envelope commands
    #[command(subcommand, alias = "sobre")]
    Envelope(EnvelopeCommands),

    /// Automation rule commands
    #[command(subcommand, alias = "auto")]
    Automation(AutomationCommands),

    /// Send money to a phone number
    Send(TransferArgs),

    /// Receive money from a phone number
    Receive(TransferArgs),

    /// Pay a mobile recharge
    Recharge(RechargeArgs),

    /// Show transfer history
    History {
        /// Show recharges instead of transfers
        #[arg(short, long)]
        recharges: bool,
    },

    /// Notification inbox commands
    #[command(subcommand, alias = "notif")]
    Notifications(NotificationCommands),

    /// Start a session
    Login(LoginArgs),

    /// End the session and reset the ledger
    Logout,

    /// Show the profile and session state
    Profile,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Run the simulated biometric validation
    Biometric {
        /// Force an outcome: success, mismatch or timeout
        #[arg(short, long)]
        force: Option<String>,
    },
}

/// Dispatch one parsed command
pub async fn execute(store: &BankStore, command: SessionCommand) -> BankResult<()> {
    let symbol = store.settings().currency_symbol.clone();

    match command {
        SessionCommand::Balance => {
            print!("{}", format_balance(store.balance()?, &symbol));
        }
        SessionCommand::Contact(cmd) => handle_contact_command(store, cmd)?,
        SessionCommand::Envelope(cmd) => handle_envelope_command(store, cmd)?,
        SessionCommand::Automation(cmd) => handle_automation_command(store, cmd)?,
        SessionCommand::Send(args) => handle_transfer_command(store, args, false)?,
        SessionCommand::Receive(args) => handle_transfer_command(store, args, true)?,
        SessionCommand::Recharge(args) => handle_recharge_command(store, args)?,
        SessionCommand::History { recharges } => handle_history_command(store, recharges)?,
        SessionCommand::Notifications(cmd) => handle_notification_command(store, cmd)?,
        SessionCommand::Login(args) => handle_login_command(store, args)?,
        SessionCommand::Logout => {
            crate::services::AuthService::new(store).logout()?;
            println!("Sesión cerrada. Los datos de la billetera se restablecieron.");
        }
        SessionCommand::Profile => {
            let state = store.snapshot()?;
            print!(
                "{}",
                format_profile(&state.profile, state.is_authenticated, state.biometric_registered)
            );
        }
        SessionCommand::Audit { limit } => match store.audit_logger() {
            Some(logger) => {
                let entries = logger.read_recent(limit)?;
                if entries.is_empty() {
                    println!("La bitácora está vacía.");
                }
                for entry in entries {
                    println!("{}", entry.format_human_readable());
                }
            }
            None => println!("La bitácora está desactivada (audit_enabled = false)."),
        },
        SessionCommand::Biometric { force } => {
            handle_biometric_command(store, force.as_deref()).await?
        }
    }

    Ok(())
}

/// Split a session line into words, honoring single and double quotes
pub fn split_line(line: &str) -> BankResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(BankError::Validation("Comillas sin cerrar".into()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Parse a user-typed amount
pub(crate) fn parse_amount(input: &str) -> BankResult<Money> {
    Money::parse(input).map_err(|e| {
        BankError::Validation(format!(
            "Monto inválido: '{}'. Use un formato como '1000' o '1000.50'. {}",
            input, e
        ))
    })
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Find an envelope by id or name
pub(crate) fn resolve_envelope(store: &BankStore, reference: &str) -> BankResult<Envelope> {
    store
        .envelopes()?
        .into_iter()
        .find(|e| e.id.matches(reference) || same_text(&e.name, reference))
        .ok_or_else(|| BankError::envelope_not_found(reference))
}

/// Find a contact by id, name or phone
pub(crate) fn resolve_contact(store: &BankStore, reference: &str) -> BankResult<Contact> {
    store
        .contacts()?
        .into_iter()
        .find(|c| {
            c.id.matches(reference)
                || same_text(&c.name, reference)
                || (!crate::models::normalize_phone(reference).is_empty() && c.has_phone(reference))
        })
        .ok_or_else(|| BankError::contact_not_found(reference))
}

/// Find an automation rule by id or title
pub(crate) fn resolve_automation(store: &BankStore, reference: &str) -> BankResult<AutomationRule> {
    store
        .automations()?
        .into_iter()
        .find(|r| r.id.matches(reference) || same_text(&r.title, reference))
        .ok_or_else(|| BankError::automation_not_found(reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_split_line_quotes() {
        let words = split_line(r#"send "Luis Rojas" 7012-5566 1000 --note 'pago renta'"#).unwrap();
        assert_eq!(
            words,
            vec!["send", "Luis Rojas", "7012-5566", "1000", "--note", "pago renta"]
        );
        assert_eq!(split_line("  balance  ").unwrap(), vec!["balance"]);
        assert_eq!(split_line(r#"contact add "" 88881212"#).unwrap(), vec!["contact", "add", "", "88881212"]);
        assert!(split_line(r#"send "abierto"#).is_err());
    }

    #[test]
    fn test_parse_session_line() {
        let line = SessionLine::try_parse_from(["envelope", "allocate", "Renta", "--", "-500"]).unwrap();
        assert!(matches!(line.command, SessionCommand::Envelope(_)));
        assert!(SessionLine::try_parse_from(["volar"]).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,000.50").unwrap(), Money::from_units_cents(1000, 50));
        assert!(parse_amount("mil").unwrap_err().is_validation());
    }

    #[test]
    fn test_resolve_contact() {
        let store = BankStore::new(Settings::default());
        assert_eq!(resolve_contact(&store, "mamá").unwrap().phone, "8888-0001");
        assert_eq!(resolve_contact(&store, "7012 5566").unwrap().name, "Luis Rojas");
        assert!(resolve_contact(&store, "Nadie").unwrap_err().is_not_found());
    }
}

//! Envelope CLI commands

use clap::Subcommand;

use crate::display::{format_envelope_details, format_envelope_list};
use crate::error::BankResult;
use crate::models::{AllocationOutcome, EnvelopeDraft, EnvelopeUpdate};
use crate::services::{AllocationOptions, EnvelopeService};
use crate::storage::BankStore;

use super::{parse_amount, resolve_envelope};

/// Envelope subcommands
#[derive(Subcommand, Debug)]
pub enum EnvelopeCommands {
    /// Create an empty envelope
    Create {
        /// Envelope name
        name: String,
        /// Savings goal (e.g. "250000")
        #[arg(short, long)]
        target: Option<String>,
        /// Color hex code
        #[arg(short, long)]
        color: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List envelopes
    List,
    /// Show envelope details
    Show {
        /// Envelope id or name
        envelope: String,
    },
    /// Edit an envelope
    Update {
        /// Envelope id or name
        envelope: String,
        #[arg(short, long)]
        name: Option<String>,
        /// New goal; 0 clears it
        #[arg(short, long, allow_hyphen_values = true)]
        target: Option<String>,
        /// Overwrite the balance
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove an envelope and its automations
    Remove {
        /// Envelope id or name
        envelope: String,
    },
    /// Deposit (positive) or withdraw (negative) money
    Allocate {
        /// Envelope id or name
        envelope: String,
        /// Signed amount
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Allow the balance to go below zero
        #[arg(long)]
        allow_negative: bool,
        /// Free text recorded with the allocation
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Show totals across envelopes
    Summary,
}

/// Handle an envelope command
pub fn handle_envelope_command(store: &BankStore, cmd: EnvelopeCommands) -> BankResult<()> {
    let service = EnvelopeService::new(store);
    let symbol = store.settings().currency_symbol.as_str();

    match cmd {
        EnvelopeCommands::Create {
            name,
            target,
            color,
            description,
        } => {
            let target_amount = target.as_deref().map(parse_amount).transpose()?;
            let envelope = service.create_envelope(EnvelopeDraft {
                name,
                color,
                target_amount,
                description,
            })?;
            println!("Sobre creado: {}", envelope.name);
            println!("  ID: {}", envelope.id);
        }

        EnvelopeCommands::List => {
            print!("{}", format_envelope_list(&service.list()?, symbol));
        }

        EnvelopeCommands::Show { envelope } => {
            let found = resolve_envelope(store, &envelope)?;
            print!("{}", format_envelope_details(&found, symbol));
        }

        EnvelopeCommands::Update {
            envelope,
            name,
            target,
            balance,
            color,
            description,
        } => {
            let found = resolve_envelope(store, &envelope)?;
            let update = EnvelopeUpdate {
                name,
                color,
                target_amount: target.as_deref().map(parse_amount).transpose()?,
                balance: balance.as_deref().map(parse_amount).transpose()?,
                description,
            };
            let report = service.update_envelope(found.id, update)?;
            println!("Sobre actualizado: {}", report.envelope.name);
            for field in &report.ignored {
                println!("  Valor negativo ignorado en '{}'", field);
            }
        }

        EnvelopeCommands::Remove { envelope } => {
            let found = resolve_envelope(store, &envelope)?;
            let removed = service.remove_envelope(found.id)?;
            println!("Sobre eliminado: {}", removed.name);
        }

        EnvelopeCommands::Allocate {
            envelope,
            amount,
            allow_negative,
            label,
        } => {
            let found = resolve_envelope(store, &envelope)?;
            let amount = parse_amount(&amount)?;
            let outcome = service.allocate_to_envelope(
                found.id,
                amount,
                AllocationOptions {
                    allow_negative,
                    label,
                },
            )?;
            match outcome {
                AllocationOutcome::Applied { previous, balance } => println!(
                    "{}: {} -> {}",
                    found.name,
                    previous.format_with_symbol(symbol),
                    balance.format_with_symbol(symbol)
                ),
                AllocationOutcome::Unchanged { balance } => println!(
                    "{}: sin cambios ({})",
                    found.name,
                    balance.format_with_symbol(symbol)
                ),
            }
        }

        EnvelopeCommands::Summary => {
            let summary = service.summary()?;
            println!("Sobres:        {}", summary.count);
            println!(
                "Total apartado: {}",
                summary.total_balance.format_with_symbol(symbol)
            );
            println!(
                "Total en metas: {}",
                summary.total_target.format_with_symbol(symbol)
            );
            println!("Metas cumplidas: {}", summary.completed);
        }
    }

    Ok(())
}

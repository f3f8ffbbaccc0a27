//! Automation CLI commands

use clap::Subcommand;

use crate::display::format_automation_list;
use crate::error::BankResult;
use crate::models::{AutomationDraft, AutomationUpdate};
use crate::services::AutomationService;
use crate::storage::BankStore;

use super::{resolve_automation, resolve_envelope};

/// Automation subcommands
#[derive(Subcommand, Debug)]
pub enum AutomationCommands {
    /// Route inbound transfers from a phone into an envelope
    Create {
        /// Phone to match
        phone: String,
        /// Envelope id or name
        envelope: String,
        /// Rule title (defaults to "Automatización <sobre>")
        #[arg(short, long)]
        title: Option<String>,
        /// Create paused
        #[arg(long)]
        paused: bool,
    },
    /// List automation rules
    List,
    /// Edit a rule; changing the envelope moves the money it routed
    Update {
        /// Rule id or title
        automation: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        /// Envelope id or name
        #[arg(short, long)]
        envelope: Option<String>,
    },
    /// Pause or resume a rule
    Toggle {
        /// Rule id or title
        automation: String,
    },
    /// Remove a rule
    Remove {
        /// Rule id or title
        automation: String,
    },
}

/// Handle an automation command
pub fn handle_automation_command(store: &BankStore, cmd: AutomationCommands) -> BankResult<()> {
    let service = AutomationService::new(store);

    match cmd {
        AutomationCommands::Create {
            phone,
            envelope,
            title,
            paused,
        } => {
            let target = resolve_envelope(store, &envelope)?;
            let rule = service.create_automation_rule(AutomationDraft {
                title,
                active: Some(!paused),
                ..AutomationDraft::new(phone, target.id)
            })?;
            println!("Automatización creada: {}", rule.title);
            println!("  {} -> {}", rule.match_phone, target.name);
            println!("  ID: {}", rule.id);
        }

        AutomationCommands::List => {
            print!(
                "{}",
                format_automation_list(&service.list()?, &store.envelopes()?)
            );
        }

        AutomationCommands::Update {
            automation,
            title,
            phone,
            envelope,
        } => {
            let found = resolve_automation(store, &automation)?;
            let envelope_id = match envelope {
                Some(reference) => Some(resolve_envelope(store, &reference)?.id),
                None => None,
            };
            let updated = service.update_automation_rule(
                found.id,
                AutomationUpdate {
                    title,
                    match_phone: phone,
                    envelope_id,
                    active: None,
                },
            )?;
            println!("Automatización actualizada: {}", updated.title);
        }

        AutomationCommands::Toggle { automation } => {
            let found = resolve_automation(store, &automation)?;
            let updated = service.set_automation_active(found.id, !found.active)?;
            println!(
                "{}: {}",
                updated.title,
                if updated.active { "activa" } else { "pausada" }
            );
        }

        AutomationCommands::Remove { automation } => {
            let found = resolve_automation(store, &automation)?;
            let removed = service.remove_automation_rule(found.id)?;
            println!("Automatización eliminada: {}", removed.title);
        }
    }

    Ok(())
}

//! Notification CLI commands

use clap::Subcommand;

use crate::display::format_notification_list;
use crate::error::{BankError, BankResult};
use crate::models::{NotificationId, NotificationItem};
use crate::services::NotificationService;
use crate::storage::BankStore;

/// Notification subcommands
#[derive(Subcommand, Debug)]
pub enum NotificationCommands {
    /// List notifications
    List,
    /// Mark one notification as read
    Read {
        /// Notification id
        id: String,
    },
    /// Flip the read flag of one notification
    Toggle {
        /// Notification id
        id: String,
    },
    /// Mark everything as read
    ReadAll,
    /// Delete every notification
    Clear,
}

fn resolve(items: &[NotificationItem], reference: &str) -> BankResult<NotificationId> {
    items
        .iter()
        .find(|n| n.id.matches(reference))
        .map(|n| n.id)
        .ok_or_else(|| BankError::notification_not_found(reference))
}

/// Handle a notification command
pub fn handle_notification_command(store: &BankStore, cmd: NotificationCommands) -> BankResult<()> {
    let service = NotificationService::new(store);

    match cmd {
        NotificationCommands::List => {
            print!("{}", format_notification_list(&service.list()?));
        }
        NotificationCommands::Read { id } => {
            let id = resolve(&service.list()?, &id)?;
            service.mark_notification_read(id)?;
            println!("Notificación marcada como leída");
        }
        NotificationCommands::Toggle { id } => {
            let id = resolve(&service.list()?, &id)?;
            let read = service.toggle_notification_read(id)?;
            println!(
                "Notificación marcada como {}",
                if read { "leída" } else { "no leída" }
            );
        }
        NotificationCommands::ReadAll => {
            let changed = service.mark_all_notifications_read()?;
            println!("{} notificaciones marcadas como leídas", changed);
        }
        NotificationCommands::Clear => {
            let removed = service.clear_notifications()?;
            println!("{} notificaciones eliminadas", removed);
        }
    }

    Ok(())
}

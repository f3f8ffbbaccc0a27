//! Contact CLI commands

use clap::Subcommand;

use crate::display::format_contact_list;
use crate::error::BankResult;
use crate::models::{ContactDraft, ContactUpdate};
use crate::services::ContactService;
use crate::storage::BankStore;

use super::resolve_contact;

/// Contact subcommands
#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// Add a contact, merging into an existing one with the same phone
    Add {
        /// Contact name
        name: String,
        /// Phone number
        phone: String,
        /// Mark as favorite
        #[arg(short, long)]
        favorite: bool,
    },
    /// List contacts
    List {
        /// Only favorites
        #[arg(short, long)]
        favorites: bool,
    },
    /// Edit a contact; blank values are ignored
    Update {
        /// Contact id, name or phone
        contact: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Remove a contact
    Remove {
        /// Contact id, name or phone
        contact: String,
    },
    /// Toggle the favorite flag
    Favorite {
        /// Contact id, name or phone
        contact: String,
    },
}

/// Handle a contact command
pub fn handle_contact_command(store: &BankStore, cmd: ContactCommands) -> BankResult<()> {
    let service = ContactService::new(store);

    match cmd {
        ContactCommands::Add {
            name,
            phone,
            favorite,
        } => {
            let contact = service.add_contact(ContactDraft {
                favorite: favorite.then_some(true),
                ..ContactDraft::new(name, phone)
            })?;
            println!("Contacto guardado: {} ({})", contact.name, contact.phone);
            println!("  ID: {}", contact.id);
        }

        ContactCommands::List { favorites } => {
            let contacts = if favorites {
                service.favorites()?
            } else {
                service.list()?
            };
            print!("{}", format_contact_list(&contacts));
        }

        ContactCommands::Update {
            contact,
            name,
            phone,
        } => {
            let found = resolve_contact(store, &contact)?;
            if name.is_none() && phone.is_none() {
                println!("Sin cambios. Use --name o --phone.");
                return Ok(());
            }
            let updated = service.update_contact(
                found.id,
                ContactUpdate {
                    name,
                    phone,
                    ..ContactUpdate::default()
                },
            )?;
            println!("Contacto actualizado: {} ({})", updated.name, updated.phone);
        }

        ContactCommands::Remove { contact } => {
            let found = resolve_contact(store, &contact)?;
            let removed = service.remove_contact(found.id)?;
            println!("Contacto eliminado: {}", removed.name);
        }

        ContactCommands::Favorite { contact } => {
            let found = resolve_contact(store, &contact)?;
            let favorite = service.toggle_favorite_contact(found.id)?;
            println!(
                "{} {}",
                found.name,
                if favorite {
                    "ahora es favorito"
                } else {
                    "ya no es favorito"
                }
            );
        }
    }

    Ok(())
}

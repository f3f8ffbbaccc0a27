//! Contact display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Contact;

#[derive(Tabled)]
struct ContactRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Nombre")]
    name: String,
    #[tabled(rename = "Teléfono")]
    phone: String,
    #[tabled(rename = "Fav")]
    favorite: &'static str,
    #[tabled(rename = "Último uso")]
    last_used: String,
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            favorite: if contact.favorite { "★" } else { "" },
            last_used: contact
                .last_used_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Format the contact directory as a table
pub fn format_contact_list(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No hay contactos.\n".to_string();
    }

    let mut table = Table::new(contacts.iter().map(ContactRow::from));
    table.with(Style::psql());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_contact_list() {
        let mut contact = Contact::new("Mamá", "88880001", "#F97316");
        contact.favorite = true;

        let output = format_contact_list(&[contact]);
        assert!(output.contains("Nombre"));
        assert!(output.contains("Mamá"));
        assert!(output.contains("8888-0001"));
        assert!(output.contains("★"));
    }

    #[test]
    fn test_format_empty() {
        assert!(format_contact_list(&[]).contains("No hay contactos"));
    }
}

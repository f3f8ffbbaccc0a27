//! Display formatting for terminal output
//!
//! Formats ledger data for the CLI session: tables for lists, aligned
//! key/value blocks for details. Amounts are rendered with the currency
//! symbol from the settings.

pub mod contact;
pub mod envelope;
pub mod history;
pub mod notification;

pub use contact::format_contact_list;
pub use envelope::{format_automation_list, format_envelope_details, format_envelope_list};
pub use history::{format_recharge_history, format_transfer_history};
pub use notification::format_notification_list;

use crate::models::{Money, UserProfile};

/// Format the account balance line
pub fn format_balance(balance: Money, symbol: &str) -> String {
    format!("Saldo disponible: {}\n", balance.format_with_symbol(symbol))
}

/// Format the profile and session state
pub fn format_profile(profile: &UserProfile, authenticated: bool, biometric: bool) -> String {
    let mut output = String::new();
    output.push_str(&format!("Perfil:     {}\n", profile.name));
    if !profile.id.is_empty() {
        output.push_str(&format!("  Identificación: {} ({})\n", profile.id, profile.id_type));
    }
    if !profile.phone.is_empty() {
        output.push_str(&format!("  Teléfono:       {}\n", profile.phone));
    }
    output.push_str(&format!(
        "  Sesión:         {}\n",
        if authenticated { "activa" } else { "cerrada" }
    ));
    output.push_str(&format!(
        "  Biometría:      {}\n",
        if biometric { "registrada" } else { "sin registrar" }
    ));
    output
}

/// Pad or cut a string to `max_len` characters
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_balance() {
        let line = format_balance(Money::from_units_cents(509_015, 40), "₡");
        assert_eq!(line, "Saldo disponible: ₡509,015.40\n");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Mamá", 6), "Mamá  ");
        let cut = truncate("Sofía Méndez Rodríguez", 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }
}

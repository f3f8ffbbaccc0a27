//! Seeded defaults
//!
//! The state a fresh store starts from, and the state `logout` returns the
//! ledger fields to.

use chrono::Utc;

use crate::config::Settings;
use crate::models::contact::AVATAR_PALETTE;
use crate::models::{
    Contact, IdType, NotificationCategory, NotificationItem, UserProfile,
};

use super::BankState;

/// Contacts every new session starts with
const SEED_CONTACTS: [(&str, &str); 3] = [
    ("Mamá", "88880001"),
    ("Luis Rojas", "70125566"),
    ("Sofía Méndez", "60334411"),
];

/// Profile shown before anyone logs in
pub fn default_profile() -> UserProfile {
    UserProfile {
        name: "Invitado".to_string(),
        id: String::new(),
        phone: String::new(),
        avatar_color: AVATAR_PALETTE[0].to_string(),
        id_type: IdType::Nacional,
    }
}

/// Seeded favorite contacts
pub fn seed_contacts() -> Vec<Contact> {
    SEED_CONTACTS
        .iter()
        .enumerate()
        .map(|(i, (name, phone))| {
            let mut contact = Contact::new(*name, phone, AVATAR_PALETTE[(i + 1) % AVATAR_PALETTE.len()]);
            contact.favorite = true;
            contact
        })
        .collect()
}

fn welcome_notification() -> NotificationItem {
    NotificationItem::new(
        "Bienvenido",
        "Tu billetera está lista. Crea sobres para organizar tu dinero.",
        NotificationCategory::General,
        Utc::now(),
    )
}

/// Build a complete seeded state
pub fn seed_state(settings: &Settings) -> BankState {
    let mut state = BankState {
        balance: settings.opening_balance,
        contacts: Vec::new(),
        envelopes: Vec::new(),
        automations: Vec::new(),
        transfers: Vec::new(),
        recharges: Vec::new(),
        notifications: Vec::new(),
        profile: default_profile(),
        is_authenticated: false,
        biometric_registered: false,
        biometric_attempts: Vec::new(),
    };
    reset_ledger(&mut state, settings);
    state
}

/// Return the ledger fields to their seeded values
///
/// Profile and biometric registration are kept.
pub fn reset_ledger(state: &mut BankState, settings: &Settings) {
    state.balance = settings.opening_balance;
    state.contacts = seed_contacts();
    state.envelopes.clear();
    state.automations.clear();
    state.transfers.clear();
    state.recharges.clear();
    state.notifications = vec![welcome_notification()];
    state.is_authenticated = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    #[test]
    fn test_seed_state() {
        let settings = Settings::default();
        let state = seed_state(&settings);

        assert_eq!(state.balance, Money::from_units_cents(509_015, 40));
        assert_eq!(state.contacts.len(), 3);
        assert!(state.contacts.iter().all(|c| c.favorite));
        assert!(state.envelopes.is_empty());
        assert_eq!(state.notifications.len(), 1);
        assert!(!state.is_authenticated);
    }

    #[test]
    fn test_seed_contacts_have_formatted_phones() {
        let contacts = seed_contacts();
        assert_eq!(contacts[0].phone, "8888-0001");
    }

    #[test]
    fn test_reset_keeps_profile() {
        let settings = Settings::default();
        let mut state = seed_state(&settings);
        state.profile.name = "Ana".into();
        state.balance = Money::zero();
        state.biometric_registered = true;

        reset_ledger(&mut state, &settings);

        assert_eq!(state.profile.name, "Ana");
        assert!(state.biometric_registered);
        assert_eq!(state.balance, settings.opening_balance);
    }
}

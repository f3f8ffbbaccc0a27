//! Contact directory service
//!
//! Contacts are deduplicated by normalized phone: adding a contact whose
//! phone already exists merges into the existing record. The list is kept in
//! most-recently-used order.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::contact::random_avatar_color;
use crate::models::phone::{format_phone, normalize_phone};
use crate::models::{Contact, ContactDraft, ContactId, ContactUpdate};
use crate::storage::{AuditBatch, BankState, BankStore};

/// Service for the contact directory
pub struct ContactService<'a> {
    store: &'a BankStore,
}

fn position_by_phone(state: &BankState, digits: &str) -> Option<usize> {
    state
        .contacts
        .iter()
        .position(|c| c.normalized_phone() == digits)
}

fn position_by_id(state: &BankState, id: ContactId) -> BankResult<usize> {
    state
        .contacts
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| BankError::contact_not_found(id.to_string()))
}

/// Move the contact at `index` to the head of the list
fn promote(state: &mut BankState, index: usize) {
    let contact = state.contacts.remove(index);
    state.contacts.insert(0, contact);
}

/// Insert or merge a contact by phone, leaving it at the head of the list
pub(crate) fn upsert_contact(
    state: &mut BankState,
    audit: &mut AuditBatch,
    draft: &ContactDraft,
) -> BankResult<Contact> {
    let digits = normalize_phone(&draft.phone);
    if digits.is_empty() {
        return Err(BankError::InvalidPhone(draft.phone.clone()));
    }

    if let Some(index) = position_by_phone(state, &digits) {
        let before = state.contacts[index].clone();
        ContactUpdate {
            name: Some(draft.name.clone()),
            phone: Some(draft.phone.clone()),
            avatar_color: draft.avatar_color.clone(),
            favorite: draft.favorite,
        }
        .apply_to(&mut state.contacts[index]);
        promote(state, index);

        let merged = state.contacts[0].clone();
        audit.log_update(
            EntityType::Contact,
            merged.id.to_string(),
            Some(merged.name.clone()),
            &before,
            &merged,
            None,
        );
        debug!(contact = %merged.id, "merged contact by phone");
        return Ok(merged);
    }

    let name = match draft.name.trim() {
        "" => format_phone(&digits),
        name => name.to_string(),
    };
    let color = draft
        .avatar_color
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(random_avatar_color);

    let mut contact = Contact::new(name, &digits, color);
    contact.favorite = draft.favorite.unwrap_or(false);

    audit.log_create(
        EntityType::Contact,
        contact.id.to_string(),
        Some(contact.name.clone()),
        &contact,
    );
    state.contacts.insert(0, contact.clone());
    Ok(contact)
}

/// Refresh `last_used_at` for the contact with this phone, creating it if needed
///
/// New contacts created here become favorites while the directory holds
/// fewer than `favorite_threshold` entries.
pub(crate) fn record_usage(
    state: &mut BankState,
    audit: &mut AuditBatch,
    favorite_threshold: usize,
    raw_phone: &str,
    name: Option<&str>,
    at: DateTime<Utc>,
) -> BankResult<Contact> {
    let digits = normalize_phone(raw_phone);
    if digits.is_empty() {
        return Err(BankError::InvalidPhone(raw_phone.to_string()));
    }
    let name = name.map(str::trim).filter(|n| !n.is_empty());

    if let Some(index) = position_by_phone(state, &digits) {
        let before = state.contacts[index].clone();
        let contact = &mut state.contacts[index];
        if let Some(name) = name {
            contact.name = name.to_string();
        }
        contact.touch(at);
        promote(state, index);

        let used = state.contacts[0].clone();
        audit.log_update(
            EntityType::Contact,
            used.id.to_string(),
            Some(used.name.clone()),
            &before,
            &used,
            None,
        );
        return Ok(used);
    }

    let display_name = name
        .map(str::to_string)
        .unwrap_or_else(|| format_phone(&digits));
    let mut contact = Contact::new(display_name, &digits, random_avatar_color());
    contact.favorite = state.contacts.len() < favorite_threshold;
    contact.touch(at);

    audit.log_create(
        EntityType::Contact,
        contact.id.to_string(),
        Some(contact.name.clone()),
        &contact,
    );
    state.contacts.insert(0, contact.clone());
    Ok(contact)
}

impl<'a> ContactService<'a> {
    pub fn new(store: &'a BankStore) -> Self {
        Self { store }
    }

    /// Add a contact, merging into an existing one with the same phone
    pub fn add_contact(&self, draft: ContactDraft) -> BankResult<Contact> {
        if draft.phone.trim().is_empty() {
            return Err(BankError::Validation(
                "El número de teléfono es obligatorio".into(),
            ));
        }
        self.store
            .transact(|state, audit| upsert_contact(state, audit, &draft))
    }

    /// Merge fields into a contact; blank name or phone keep the current value
    ///
    /// Changing the phone to one owned by another contact merges the update
    /// into that contact, drops the edited one and moves the survivor to the
    /// head of the list.
    pub fn update_contact(&self, id: ContactId, update: ContactUpdate) -> BankResult<Contact> {
        self.store.transact(|state, audit| {
            let index = position_by_id(state, id)?;

            let owner = update
                .phone
                .as_deref()
                .map(normalize_phone)
                .filter(|digits| !digits.is_empty())
                .and_then(|digits| position_by_phone(state, &digits))
                .filter(|&owner| owner != index);

            let Some(owner) = owner else {
                let before = state.contacts[index].clone();
                update.apply_to(&mut state.contacts[index]);
                let after = state.contacts[index].clone();

                audit.log_update(
                    EntityType::Contact,
                    after.id.to_string(),
                    Some(after.name.clone()),
                    &before,
                    &after,
                    None,
                );
                return Ok(after);
            };

            let edited = state.contacts.remove(index);
            let owner = if owner > index { owner - 1 } else { owner };

            let before = state.contacts[owner].clone();
            update.apply_to(&mut state.contacts[owner]);
            promote(state, owner);
            let merged = state.contacts[0].clone();

            audit.log_delete(
                EntityType::Contact,
                edited.id.to_string(),
                Some(edited.name.clone()),
                &edited,
            );
            audit.log_update(
                EntityType::Contact,
                merged.id.to_string(),
                Some(merged.name.clone()),
                &before,
                &merged,
                None,
            );
            debug!(removed = %edited.id, contact = %merged.id, "merged contact on phone change");
            Ok(merged)
        })
    }

    pub fn remove_contact(&self, id: ContactId) -> BankResult<Contact> {
        self.store.transact(|state, audit| {
            let index = position_by_id(state, id)?;
            let removed = state.contacts.remove(index);
            audit.log_delete(
                EntityType::Contact,
                removed.id.to_string(),
                Some(removed.name.clone()),
                &removed,
            );
            Ok(removed)
        })
    }

    /// Flip the favorite flag, returning the new value
    pub fn toggle_favorite_contact(&self, id: ContactId) -> BankResult<bool> {
        self.store.transact(|state, audit| {
            let index = position_by_id(state, id)?;
            let before = state.contacts[index].clone();
            let contact = &mut state.contacts[index];
            contact.favorite = !contact.favorite;
            audit.log_update(
                EntityType::Contact,
                contact.id.to_string(),
                Some(contact.name.clone()),
                &before,
                &*contact,
                None,
            );
            Ok(contact.favorite)
        })
    }

    /// Mark the contact with this phone as just used, creating it if needed
    pub fn record_contact_usage(&self, phone: &str, name: Option<&str>) -> BankResult<Contact> {
        let threshold = self.store.settings().favorite_bootstrap_threshold;
        self.store.transact(|state, audit| {
            record_usage(state, audit, threshold, phone, name, Utc::now())
        })
    }

    pub fn find_by_phone(&self, phone: &str) -> BankResult<Option<Contact>> {
        let digits = normalize_phone(phone);
        self.store.read(|s| {
            s.contacts
                .iter()
                .find(|c| c.normalized_phone() == digits)
                .cloned()
        })
    }

    pub fn get(&self, id: ContactId) -> BankResult<Option<Contact>> {
        self.store
            .read(|s| s.contacts.iter().find(|c| c.id == id).cloned())
    }

    pub fn list(&self) -> BankResult<Vec<Contact>> {
        self.store.contacts()
    }

    pub fn favorites(&self) -> BankResult<Vec<Contact>> {
        self.store
            .read(|s| s.contacts.iter().filter(|c| c.favorite).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::storage::seed_state;

    fn empty_store() -> BankStore {
        let settings = Settings::default();
        let mut state = seed_state(&settings);
        state.contacts.clear();
        BankStore::with_state(settings, state)
    }

    #[test]
    fn test_add_contact_defaults() {
        let store = empty_store();
        let service = ContactService::new(&store);

        let contact = service
            .add_contact(ContactDraft::new("Ana", "6000 1111"))
            .unwrap();

        assert_eq!(contact.phone, "6000-1111");
        assert!(!contact.favorite);
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_add_contact_requires_phone() {
        let store = empty_store();
        let service = ContactService::new(&store);

        assert!(service.add_contact(ContactDraft::new("Ana", "  ")).is_err());
        assert!(matches!(
            service.add_contact(ContactDraft::new("Ana", "sin número")),
            Err(BankError::InvalidPhone(_))
        ));
    }

    #[test]
    fn test_same_phone_merges_and_moves_to_head() {
        let store = empty_store();
        let service = ContactService::new(&store);

        let first = service
            .add_contact(ContactDraft::new("Ana", "60001111"))
            .unwrap();
        service
            .add_contact(ContactDraft::new("Luis", "70002222"))
            .unwrap();
        let merged = service
            .add_contact(ContactDraft::new("Ana María", "6000-1111"))
            .unwrap();

        let list = service.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(merged.id, first.id);
        assert_eq!(list[0].id, first.id);
        assert_eq!(list[0].name, "Ana María");
        assert_eq!(list[0].phone, "6000-1111");
    }

    #[test]
    fn test_update_ignores_blank_inputs() {
        let store = empty_store();
        let service = ContactService::new(&store);
        let contact = service
            .add_contact(ContactDraft::new("Ana", "60001111"))
            .unwrap();

        let updated = service
            .update_contact(
                contact.id,
                ContactUpdate {
                    name: Some(" ".into()),
                    phone: Some("".into()),
                    ..ContactUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.phone, "6000-1111");
    }

    #[test]
    fn test_update_to_taken_phone_merges_into_owner() {
        let store = empty_store();
        let service = ContactService::new(&store);
        let ana = service
            .add_contact(ContactDraft::new("Ana", "60001111"))
            .unwrap();
        let luis = service
            .add_contact(ContactDraft::new("Luis", "70002222"))
            .unwrap();
        service
            .add_contact(ContactDraft::new("Marta", "80003333"))
            .unwrap();

        let merged = service
            .update_contact(
                ana.id,
                ContactUpdate {
                    name: Some("Ana Luis".into()),
                    phone: Some("7000-2222".into()),
                    ..ContactUpdate::default()
                },
            )
            .unwrap();

        let list = service.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(merged.id, luis.id);
        assert_eq!(list[0].id, luis.id);
        assert_eq!(list[0].name, "Ana Luis");
        assert_eq!(list[0].phone, "7000-2222");
        assert!(service.get(ana.id).unwrap().is_none());
    }

    #[test]
    fn test_update_to_own_phone_keeps_position() {
        let store = empty_store();
        let service = ContactService::new(&store);
        let ana = service
            .add_contact(ContactDraft::new("Ana", "60001111"))
            .unwrap();
        service
            .add_contact(ContactDraft::new("Luis", "70002222"))
            .unwrap();

        service
            .update_contact(
                ana.id,
                ContactUpdate {
                    phone: Some("6000 1111".into()),
                    ..ContactUpdate::default()
                },
            )
            .unwrap();

        let list = service.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].id, ana.id);
    }

    #[test]
    fn test_remove_and_toggle_favorite() {
        let store = empty_store();
        let service = ContactService::new(&store);
        let contact = service
            .add_contact(ContactDraft::new("Ana", "60001111"))
            .unwrap();

        assert!(service.toggle_favorite_contact(contact.id).unwrap());
        assert_eq!(service.favorites().unwrap().len(), 1);

        service.remove_contact(contact.id).unwrap();
        assert!(service.list().unwrap().is_empty());
        assert!(service.remove_contact(contact.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_usage_creates_favorites_only_while_directory_small() {
        let store = empty_store();
        let service = ContactService::new(&store);

        for phone in ["60000001", "60000002", "60000003", "60000004"] {
            service.record_contact_usage(phone, None).unwrap();
        }

        let list = service.list().unwrap();
        assert_eq!(list.len(), 4);
        let favorite_count = list.iter().filter(|c| c.favorite).count();
        assert_eq!(favorite_count, 3);
        assert!(!service.find_by_phone("60000004").unwrap().unwrap().favorite);
    }

    #[test]
    fn test_usage_updates_existing_contact() {
        let store = empty_store();
        let service = ContactService::new(&store);
        let contact = service
            .add_contact(ContactDraft::new("Ana", "60001111"))
            .unwrap();
        assert!(contact.last_used_at.is_none());

        let used = service
            .record_contact_usage("6000-1111", Some("Ana R."))
            .unwrap();

        assert_eq!(used.id, contact.id);
        assert_eq!(used.name, "Ana R.");
        assert!(used.last_used_at.is_some());
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_usage_without_name_uses_formatted_phone() {
        let store = empty_store();
        let service = ContactService::new(&store);
        let contact = service.record_contact_usage("60001111", Some("  ")).unwrap();
        assert_eq!(contact.name, "6000-1111");
    }
}

//! Automation service
//!
//! Automation rules route inbound transfers from a phone number into an
//! envelope. At most one active rule may exist per normalized phone.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::phone::format_phone;
use crate::models::{
    normalize_phone, AutomationDraft, AutomationId, AutomationRule, AutomationUpdate, EnvelopeId,
    Money, NotificationCategory, NotificationDraft, TransferRecord,
};
use crate::storage::{AuditBatch, BankState, BankStore};

use super::envelope::{apply_envelope_allocation, position as envelope_position, AllocationOptions};
use super::notification::push_notification;

/// Service for automation rules
pub struct AutomationService<'a> {
    store: &'a BankStore,
}

/// What happened when an inbound transfer matched a rule
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationFiring {
    pub automation_id: AutomationId,
    pub rule_title: String,
    pub envelope_id: EnvelopeId,
    pub envelope_name: String,
    pub amount: Money,
    /// Envelope balance after the credit
    pub envelope_balance: Money,
}

fn position(state: &BankState, id: AutomationId) -> BankResult<usize> {
    state
        .automations
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| BankError::automation_not_found(id.to_string()))
}

fn validated_phone(raw: &str) -> BankResult<String> {
    if raw.trim().is_empty() {
        return Err(BankError::Validation(
            "El teléfono de la automatización es obligatorio".into(),
        ));
    }
    let digits = normalize_phone(raw);
    if digits.is_empty() {
        return Err(BankError::InvalidPhone(raw.to_string()));
    }
    Ok(digits)
}

/// Refuse a second active rule on the same phone
fn ensure_unique_active(
    state: &BankState,
    normalized_phone: &str,
    except: Option<AutomationId>,
) -> BankResult<()> {
    let taken = state
        .automations
        .iter()
        .any(|r| Some(r.id) != except && r.matches(normalized_phone));
    if taken {
        return Err(BankError::Duplicate {
            entity_type: "Automatización activa",
            identifier: format_phone(normalized_phone),
        });
    }
    Ok(())
}

/// Total credited to an envelope through this rule, over retained transfers
fn credited_through(state: &BankState, id: AutomationId) -> BankResult<Money> {
    Money::checked_sum(
        state
            .transfers
            .iter()
            .filter(|t| t.automation_id == Some(id))
            .map(|t| t.amount),
    )
    .ok_or_else(|| {
        BankError::Validation("El monto acreditado por la automatización es demasiado grande".into())
    })
}

/// Route an inbound transfer through the first matching active rule
///
/// Credits the envelope, annotates `transfer`, stamps the rule with the
/// transfer's timestamp and pushes a notification. Must run inside the same
/// transaction that records the transfer.
pub(crate) fn fire_automation(
    state: &mut BankState,
    audit: &mut AuditBatch,
    transfer: &mut TransferRecord,
    notification_limit: usize,
    at: DateTime<Utc>,
) -> BankResult<Option<AutomationFiring>> {
    let Some(index) = state
        .automations
        .iter()
        .position(|r| r.matches(&transfer.normalized_phone))
    else {
        debug!(phone = %transfer.normalized_phone, "no automation matched");
        return Ok(None);
    };

    let rule = state.automations[index].clone();
    debug!(automation = %rule.id, envelope = %rule.envelope_id, "automation matched");

    let options = AllocationOptions::labeled(rule.title.clone());
    let outcome = apply_envelope_allocation(
        state,
        audit,
        rule.envelope_id,
        transfer.amount,
        &options,
        at,
    )?;

    transfer.linked_envelope_id = Some(rule.envelope_id);
    transfer.automation_id = Some(rule.id);

    let fired = &mut state.automations[index];
    fired.last_triggered_at = Some(transfer.created_at);
    audit.log_update(
        EntityType::AutomationRule,
        rule.id.to_string(),
        Some(rule.title.clone()),
        &rule,
        &*fired,
        Some("last_triggered_at".to_string()),
    );

    let envelope_index = envelope_position(state, rule.envelope_id)?;
    let envelope_name = state.envelopes[envelope_index].name.clone();

    push_notification(
        state,
        audit,
        notification_limit,
        NotificationDraft::new(
            "Dinero apartado",
            format!(
                "Se apartaron {} de {} en el sobre {}",
                transfer.amount, transfer.contact_name, envelope_name
            ),
            NotificationCategory::Transfer,
        ),
        at,
    );

    info!(
        automation = %rule.id,
        envelope = %rule.envelope_id,
        amount = %transfer.amount,
        "automation fired"
    );

    Ok(Some(AutomationFiring {
        automation_id: rule.id,
        rule_title: rule.title,
        envelope_id: rule.envelope_id,
        envelope_name,
        amount: transfer.amount,
        envelope_balance: outcome.balance(),
    }))
}

impl<'a> AutomationService<'a> {
    pub fn new(store: &'a BankStore) -> Self {
        Self { store }
    }

    /// Create a rule routing a phone into an envelope
    pub fn create_automation_rule(&self, draft: AutomationDraft) -> BankResult<AutomationRule> {
        let digits = validated_phone(&draft.match_phone)?;

        self.store.transact(|state, audit| {
            let envelope_index = envelope_position(state, draft.envelope_id)?;
            let active = draft.active.unwrap_or(true);
            if active {
                ensure_unique_active(state, &digits, None)?;
            }

            let title = draft
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    AutomationRule::default_title(&state.envelopes[envelope_index].name)
                });

            let mut rule = AutomationRule::new(
                title,
                draft.match_phone.trim(),
                digits.as_str(),
                draft.envelope_id,
            );
            rule.active = active;

            audit.log_create(
                EntityType::AutomationRule,
                rule.id.to_string(),
                Some(rule.title.clone()),
                &rule,
            );
            state.automations.push(rule.clone());
            Ok(rule)
        })
    }

    /// Merge fields into a rule
    ///
    /// Changing the envelope moves the money already credited through this
    /// rule to the new envelope and relinks its transfers.
    pub fn update_automation_rule(
        &self,
        id: AutomationId,
        update: AutomationUpdate,
    ) -> BankResult<AutomationRule> {
        let new_phone = match &update.match_phone {
            Some(raw) => Some((raw.trim().to_string(), validated_phone(raw)?)),
            None => None,
        };

        self.store.transact(|state, audit| {
            let index = position(state, id)?;
            let before = state.automations[index].clone();
            let mut rule = before.clone();

            if let Some(title) = update.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                rule.title = title.to_string();
            }
            if let Some((display, digits)) = &new_phone {
                rule.match_phone = display.clone();
                rule.normalized_phone = digits.clone();
            }
            if let Some(active) = update.active {
                rule.active = active;
            }
            if let Some(envelope_id) = update.envelope_id {
                envelope_position(state, envelope_id)?;
                rule.envelope_id = envelope_id;
            }

            if rule.active {
                ensure_unique_active(state, &rule.normalized_phone, Some(id))?;
            }

            if rule.envelope_id != before.envelope_id {
                let credited = credited_through(state, id)?;
                if credited.is_positive() {
                    let now = Utc::now();
                    let options = AllocationOptions::labeled(format!("reasignación {}", rule.title));
                    apply_envelope_allocation(state, audit, before.envelope_id, -credited, &options, now)?;
                    apply_envelope_allocation(state, audit, rule.envelope_id, credited, &options, now)?;
                }
                for transfer in state
                    .transfers
                    .iter_mut()
                    .filter(|t| t.automation_id == Some(id))
                {
                    transfer.linked_envelope_id = Some(rule.envelope_id);
                }
                info!(
                    automation = %id,
                    from = %before.envelope_id,
                    to = %rule.envelope_id,
                    %credited,
                    "automation relinked"
                );
            }

            audit.log_update(
                EntityType::AutomationRule,
                id.to_string(),
                Some(rule.title.clone()),
                &before,
                &rule,
                None,
            );
            state.automations[index] = rule.clone();
            Ok(rule)
        })
    }

    /// Turn a rule on or off
    pub fn set_automation_active(&self, id: AutomationId, active: bool) -> BankResult<AutomationRule> {
        self.update_automation_rule(
            id,
            AutomationUpdate {
                active: Some(active),
                ..AutomationUpdate::default()
            },
        )
    }

    /// Delete a rule; transfers keep their envelope link but lose the rule link
    pub fn remove_automation_rule(&self, id: AutomationId) -> BankResult<AutomationRule> {
        self.store.transact(|state, audit| {
            let index = position(state, id)?;
            let removed = state.automations.remove(index);
            for transfer in state
                .transfers
                .iter_mut()
                .filter(|t| t.automation_id == Some(id))
            {
                transfer.automation_id = None;
            }
            audit.log_delete(
                EntityType::AutomationRule,
                id.to_string(),
                Some(removed.title.clone()),
                &removed,
            );
            Ok(removed)
        })
    }

    pub fn get(&self, id: AutomationId) -> BankResult<Option<AutomationRule>> {
        self.store
            .read(|s| s.automations.iter().find(|r| r.id == id).cloned())
    }

    pub fn list(&self) -> BankResult<Vec<AutomationRule>> {
        self.store.automations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{EnvelopeDraft, TransferDraft};
    use crate::services::{EnvelopeService, TransferService};

    fn store_with_envelope(name: &str) -> (BankStore, EnvelopeId) {
        let store = BankStore::new(Settings::default());
        let envelope = EnvelopeService::new(&store)
            .create_envelope(EnvelopeDraft::new(name))
            .unwrap();
        (store, envelope.id)
    }

    fn envelope_balance(store: &BankStore, id: EnvelopeId) -> Money {
        EnvelopeService::new(store).get(id).unwrap().unwrap().balance
    }

    #[test]
    fn test_create_defaults() {
        let (store, renta) = store_with_envelope("Renta");
        let service = AutomationService::new(&store);

        let rule = service
            .create_automation_rule(AutomationDraft::new(" 8888-1212 ", renta))
            .unwrap();

        assert_eq!(rule.title, "Automatización Renta");
        assert_eq!(rule.normalized_phone, "88881212");
        assert_eq!(rule.match_phone, "8888-1212");
        assert!(rule.active);
        assert!(rule.last_triggered_at.is_none());
    }

    #[test]
    fn test_create_validation() {
        let (store, renta) = store_with_envelope("Renta");
        let service = AutomationService::new(&store);

        assert!(matches!(
            service.create_automation_rule(AutomationDraft::new("  ", renta)),
            Err(BankError::Validation(_))
        ));
        assert!(matches!(
            service.create_automation_rule(AutomationDraft::new("sin dígitos", renta)),
            Err(BankError::InvalidPhone(_))
        ));
        assert!(service
            .create_automation_rule(AutomationDraft::new("88881212", EnvelopeId::new()))
            .unwrap_err()
            .is_not_found());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_active_phone_rejected() {
        let (store, renta) = store_with_envelope("Renta");
        let service = AutomationService::new(&store);
        service
            .create_automation_rule(AutomationDraft::new("88881212", renta))
            .unwrap();

        let result = service.create_automation_rule(AutomationDraft::new("8888-1212", renta));
        assert!(matches!(result, Err(BankError::Duplicate { .. })));

        let inactive = service
            .create_automation_rule(AutomationDraft {
                active: Some(false),
                ..AutomationDraft::new("8888-1212", renta)
            })
            .unwrap();
        assert!(matches!(
            service.set_automation_active(inactive.id, true),
            Err(BankError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_inbound_transfer_fires_rule() {
        let (store, renta) = store_with_envelope("Renta");
        let rule = AutomationService::new(&store)
            .create_automation_rule(AutomationDraft::new("88881212", renta))
            .unwrap();

        let received = TransferService::new(&store)
            .receive_transfer(TransferDraft::new("Jefe", "8888-1212", Money::from_units(5000)))
            .unwrap();

        let firing = received.automation.unwrap();
        assert_eq!(firing.envelope_id, renta);
        assert_eq!(firing.envelope_balance, Money::from_units(5000));
        assert_eq!(received.transfer.linked_envelope_id, Some(renta));
        assert_eq!(received.transfer.automation_id, Some(rule.id));

        let stored = AutomationService::new(&store).get(rule.id).unwrap().unwrap();
        assert_eq!(stored.last_triggered_at, Some(received.transfer.created_at));
        assert_eq!(envelope_balance(&store, renta), Money::from_units(5000));
    }

    #[test]
    fn test_inactive_rule_does_not_fire() {
        let (store, renta) = store_with_envelope("Renta");
        let rule = AutomationService::new(&store)
            .create_automation_rule(AutomationDraft::new("88881212", renta))
            .unwrap();
        AutomationService::new(&store)
            .set_automation_active(rule.id, false)
            .unwrap();

        let received = TransferService::new(&store)
            .receive_transfer(TransferDraft::new("Jefe", "88881212", Money::from_units(10)))
            .unwrap();

        assert!(received.automation.is_none());
        assert!(envelope_balance(&store, renta).is_zero());
    }

    #[test]
    fn test_changing_envelope_moves_credited_money() {
        let (store, renta) = store_with_envelope("Renta");
        let ahorro = EnvelopeService::new(&store)
            .create_envelope(EnvelopeDraft::new("Ahorro"))
            .unwrap()
            .id;
        let service = AutomationService::new(&store);
        let rule = service
            .create_automation_rule(AutomationDraft::new("88881212", renta))
            .unwrap();
        TransferService::new(&store)
            .receive_transfer(TransferDraft::new("Jefe", "88881212", Money::from_units(300)))
            .unwrap();

        service
            .update_automation_rule(
                rule.id,
                AutomationUpdate {
                    envelope_id: Some(ahorro),
                    ..AutomationUpdate::default()
                },
            )
            .unwrap();

        assert!(envelope_balance(&store, renta).is_zero());
        assert_eq!(envelope_balance(&store, ahorro), Money::from_units(300));
        let history = TransferService::new(&store).history().unwrap();
        assert_eq!(history[0].linked_envelope_id, Some(ahorro));
    }

    #[test]
    fn test_relink_refused_when_old_envelope_was_spent() {
        let (store, renta) = store_with_envelope("Renta");
        let ahorro = EnvelopeService::new(&store)
            .create_envelope(EnvelopeDraft::new("Ahorro"))
            .unwrap()
            .id;
        let service = AutomationService::new(&store);
        let rule = service
            .create_automation_rule(AutomationDraft::new("88881212", renta))
            .unwrap();
        TransferService::new(&store)
            .receive_transfer(TransferDraft::new("Jefe", "88881212", Money::from_units(300)))
            .unwrap();
        EnvelopeService::new(&store)
            .allocate_to_envelope(renta, Money::from_units(-200), AllocationOptions::default())
            .unwrap();

        let result = service.update_automation_rule(
            rule.id,
            AutomationUpdate {
                envelope_id: Some(ahorro),
                ..AutomationUpdate::default()
            },
        );

        assert!(matches!(
            result,
            Err(BankError::InsufficientEnvelopeFunds { .. })
        ));
        assert_eq!(service.get(rule.id).unwrap().unwrap().envelope_id, renta);
        assert_eq!(envelope_balance(&store, renta), Money::from_units(100));
        assert!(envelope_balance(&store, ahorro).is_zero());
    }

    #[test]
    fn test_update_blank_title_is_ignored() {
        let (store, renta) = store_with_envelope("Renta");
        let service = AutomationService::new(&store);
        let rule = service
            .create_automation_rule(AutomationDraft::new("88881212", renta))
            .unwrap();

        let updated = service
            .update_automation_rule(
                rule.id,
                AutomationUpdate {
                    title: Some("   ".into()),
                    match_phone: Some("7000-1234".into()),
                    ..AutomationUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, rule.title);
        assert_eq!(updated.normalized_phone, "70001234");
    }

    #[test]
    fn test_remove_keeps_envelope_link() {
        let (store, renta) = store_with_envelope("Renta");
        let service = AutomationService::new(&store);
        let rule = service
            .create_automation_rule(AutomationDraft::new("88881212", renta))
            .unwrap();
        TransferService::new(&store)
            .receive_transfer(TransferDraft::new("Jefe", "88881212", Money::from_units(10)))
            .unwrap();

        service.remove_automation_rule(rule.id).unwrap();

        let transfer = &TransferService::new(&store).history().unwrap()[0];
        assert_eq!(transfer.automation_id, None);
        assert_eq!(transfer.linked_envelope_id, Some(renta));
        assert!(service.list().unwrap().is_empty());
    }
}

//! Transfer service
//!
//! Moves money in and out of the account balance. Every transfer refreshes
//! the contact directory and pushes a notification; inbound transfers are
//! also offered to the automation rules.

use chrono::Utc;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::phone::{format_phone, is_dialable};
use crate::models::transfer::truncate_history;
use crate::models::{
    normalize_phone, Money, NotificationCategory, NotificationDraft, TransferDirection,
    TransferDraft, TransferId, TransferRecord,
};
use crate::storage::{BankState, BankStore};

use super::automation::{fire_automation, AutomationFiring};
use super::contact::record_usage;
use super::notification::push_notification;

/// Service for sending and receiving transfers
pub struct TransferService<'a> {
    store: &'a BankStore,
}

/// Result of an inbound transfer
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedTransfer {
    pub transfer: TransferRecord,
    /// Set when an automation routed the money into an envelope
    pub automation: Option<AutomationFiring>,
}

pub(crate) fn validate_amount(amount: Money) -> BankResult<()> {
    if !amount.is_positive() {
        return Err(BankError::Validation(
            "El monto debe ser mayor a cero".into(),
        ));
    }
    Ok(())
}

/// Normalize a phone that must be able to move money
pub(crate) fn dialable_phone(raw: &str) -> BankResult<String> {
    let digits = normalize_phone(raw);
    if !is_dialable(&digits) {
        return Err(BankError::InvalidPhone(raw.trim().to_string()));
    }
    Ok(digits)
}

pub(crate) fn ensure_covered(state: &BankState, amount: Money) -> BankResult<()> {
    if amount > state.balance {
        return Err(BankError::InsufficientFunds {
            needed: amount,
            available: state.balance,
        });
    }
    Ok(())
}

fn new_record(
    draft: &TransferDraft,
    digits: String,
    direction: TransferDirection,
) -> TransferRecord {
    let contact_name = draft.contact_name.trim();
    TransferRecord {
        id: TransferId::new(),
        contact_name: if contact_name.is_empty() {
            format_phone(&digits)
        } else {
            contact_name.to_string()
        },
        phone: format_phone(&digits),
        normalized_phone: digits,
        amount: draft.amount,
        note: draft
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        created_at: Utc::now(),
        direction,
        linked_envelope_id: None,
        automation_id: None,
    }
}

impl<'a> TransferService<'a> {
    pub fn new(store: &'a BankStore) -> Self {
        Self { store }
    }

    /// Send money to a phone number
    pub fn send_transfer(&self, draft: TransferDraft) -> BankResult<TransferRecord> {
        validate_amount(draft.amount)?;
        let digits = dialable_phone(&draft.phone)?;
        let settings = self.store.settings();

        self.store.transact(|state, audit| {
            ensure_covered(state, draft.amount)?;

            let record = new_record(&draft, digits, TransferDirection::Outbound);
            let previous = state.balance;
            state.balance -= record.amount;
            audit.log_update(
                EntityType::Account,
                "saldo",
                None,
                &previous,
                &state.balance,
                Some(format!("{} -> {}", previous, state.balance)),
            );

            record_usage(
                state,
                audit,
                settings.favorite_bootstrap_threshold,
                &record.normalized_phone,
                Some(record.contact_name.as_str()),
                record.created_at,
            )?;

            audit.log_create(
                EntityType::Transfer,
                record.id.to_string(),
                Some(record.contact_name.clone()),
                &record,
            );
            state.transfers.insert(0, record.clone());
            truncate_history(&mut state.transfers, settings.transfer_history_limit);

            push_notification(
                state,
                audit,
                settings.notification_limit,
                NotificationDraft::new(
                    "Transferencia enviada",
                    format!("Enviaste {} a {}", record.amount, record.contact_name),
                    NotificationCategory::Transfer,
                ),
                record.created_at,
            );

            info!(transfer = %record.id, amount = %record.amount, "transfer sent");
            Ok(record)
        })
    }

    /// Receive money from a phone number
    ///
    /// Credit, contact refresh, notification and automation firing happen in
    /// one transaction.
    pub fn receive_transfer(&self, draft: TransferDraft) -> BankResult<ReceivedTransfer> {
        validate_amount(draft.amount)?;
        let digits = dialable_phone(&draft.phone)?;
        let settings = self.store.settings();

        self.store.transact(|state, audit| {
            let mut record = new_record(&draft, digits, TransferDirection::Inbound);
            let previous = state.balance;
            state.balance = previous.checked_add(record.amount).ok_or_else(|| {
                BankError::Validation("El monto excede el máximo permitido".into())
            })?;
            audit.log_update(
                EntityType::Account,
                "saldo",
                None,
                &previous,
                &state.balance,
                Some(format!("{} -> {}", previous, state.balance)),
            );

            record_usage(
                state,
                audit,
                settings.favorite_bootstrap_threshold,
                &record.normalized_phone,
                Some(record.contact_name.as_str()),
                record.created_at,
            )?;

            push_notification(
                state,
                audit,
                settings.notification_limit,
                NotificationDraft::new(
                    "Transferencia recibida",
                    format!("Recibiste {} de {}", record.amount, record.contact_name),
                    NotificationCategory::Transfer,
                ),
                record.created_at,
            );

            let at = record.created_at;
            let automation =
                fire_automation(state, audit, &mut record, settings.notification_limit, at)?;

            audit.log_create(
                EntityType::Transfer,
                record.id.to_string(),
                Some(record.contact_name.clone()),
                &record,
            );
            state.transfers.insert(0, record.clone());
            truncate_history(&mut state.transfers, settings.transfer_history_limit);

            info!(
                transfer = %record.id,
                amount = %record.amount,
                routed = automation.is_some(),
                "transfer received"
            );
            Ok(ReceivedTransfer {
                transfer: record,
                automation,
            })
        })
    }

    /// Transfers, most recent first
    pub fn history(&self) -> BankResult<Vec<TransferRecord>> {
        self.store.transfers()
    }

    pub fn get(&self, id: TransferId) -> BankResult<Option<TransferRecord>> {
        self.store
            .read(|s| s.transfers.iter().find(|t| t.id == id).cloned())
    }
}

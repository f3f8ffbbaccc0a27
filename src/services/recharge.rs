//! Recharge service
//!
//! Mobile airtime recharges paid from the account balance.

use chrono::Utc;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::phone::format_phone;
use crate::models::transfer::truncate_history;
use crate::models::{
    NotificationCategory, NotificationDraft, RechargeDraft, RechargeId, RechargeRecord,
};
use crate::storage::BankStore;

use super::notification::push_notification;
use super::transfer::{dialable_phone, ensure_covered, validate_amount};

/// Service for airtime recharges
pub struct RechargeService<'a> {
    store: &'a BankStore,
}

impl<'a> RechargeService<'a> {
    pub fn new(store: &'a BankStore) -> Self {
        Self { store }
    }

    /// Pay a recharge from the balance
    pub fn make_recharge(&self, draft: RechargeDraft) -> BankResult<RechargeRecord> {
        validate_amount(draft.amount)?;
        let provider = draft.provider.trim();
        if provider.is_empty() {
            return Err(BankError::Validation(
                "Seleccione un proveedor para la recarga".into(),
            ));
        }
        let digits = dialable_phone(&draft.phone)?;
        let settings = self.store.settings();

        self.store.transact(|state, audit| {
            ensure_covered(state, draft.amount)?;

            let record = RechargeRecord {
                id: RechargeId::new(),
                provider: provider.to_string(),
                phone: format_phone(&digits),
                amount: draft.amount,
                created_at: Utc::now(),
            };

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
            audit.log_create(
                EntityType::Recharge,
                record.id.to_string(),
                Some(record.provider.clone()),
                &record,
            );
            state.recharges.insert(0, record.clone());
            truncate_history(&mut state.recharges, settings.recharge_history_limit);

            push_notification(
                state,
                audit,
                settings.notification_limit,
                NotificationDraft::new(
                    "Recarga realizada",
                    format!(
                        "Recargaste {} al {} ({})",
                        record.amount, record.phone, record.provider
                    ),
                    NotificationCategory::Recharge,
                ),
                record.created_at,
            );

            info!(recharge = %record.id, amount = %record.amount, "recharge made");
            Ok(record)
        })
    }

    /// Recharges, most recent first
    pub fn history(&self) -> BankResult<Vec<RechargeRecord>> {
        self.store.recharges()
    }
}

//! In-memory ledger store
//!
//! `BankStore` owns the whole [`BankState`] behind one lock. Every mutation
//! runs inside [`BankStore::transact`], which holds the write lock for the
//! whole operation and rolls the state back if the operation fails, so
//! multi-step effects such as automation firing are all-or-nothing.

pub mod seed;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{BilleteraPaths, Settings};
use crate::error::{BankError, BankResult};
use crate::models::{
    AutomationRule, BiometricAttempt, Contact, Envelope, Money, NotificationItem,
    RechargeRecord, TransferRecord, UserProfile,
};

pub use seed::{reset_ledger, seed_state};

/// Everything the ledger holds
///
/// Lists are ordered most-recent-first, except envelopes and automation
/// rules which keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankState {
    pub balance: Money,
    pub contacts: Vec<Contact>,
    pub envelopes: Vec<Envelope>,
    pub automations: Vec<AutomationRule>,
    pub transfers: Vec<TransferRecord>,
    pub recharges: Vec<RechargeRecord>,
    pub notifications: Vec<NotificationItem>,
    pub profile: UserProfile,
    pub is_authenticated: bool,
    pub biometric_registered: bool,
    pub biometric_attempts: Vec<BiometricAttempt>,
}

/// Audit entries collected during one transaction
pub struct AuditBatch {
    enabled: bool,
    entries: Vec<AuditEntry>,
}

impl AuditBatch {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn log_create<T: Serialize>(
        &mut self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        if self.enabled {
            self.entries
                .push(AuditEntry::create(entity_type, entity_id, entity_name, entity));
        }
    }

    pub fn log_update<T: Serialize>(
        &mut self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) {
        if self.enabled {
            self.entries.push(AuditEntry::update(
                entity_type,
                entity_id,
                entity_name,
                before,
                after,
                diff_summary,
            ));
        }
    }

    pub fn log_delete<T: Serialize>(
        &mut self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        if self.enabled {
            self.entries
                .push(AuditEntry::delete(entity_type, entity_id, entity_name, entity));
        }
    }
}

/// The ledger store: settings, state and an optional audit log
pub struct BankStore {
    settings: Settings,
    state: RwLock<BankState>,
    audit: Option<AuditLogger>,
}

impl BankStore {
    /// Create a store seeded from the settings
    pub fn new(settings: Settings) -> Self {
        let state = seed_state(&settings);
        Self::with_state(settings, state)
    }

    /// Create a store with an injected initial state
    pub fn with_state(settings: Settings, state: BankState) -> Self {
        Self {
            settings,
            state: RwLock::new(state),
            audit: None,
        }
    }

    /// Create a seeded store, attaching the audit log when settings enable it
    pub fn open(paths: &BilleteraPaths, settings: Settings) -> BankResult<Self> {
        let audit_enabled = settings.audit_enabled;
        let store = Self::new(settings);
        if audit_enabled {
            paths.ensure_directories()?;
            return Ok(store.with_audit_logger(AuditLogger::new(paths.audit_log())));
        }
        Ok(store)
    }

    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audit_logger(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    fn read_guard(&self) -> BankResult<RwLockReadGuard<'_, BankState>> {
        self.state.read().map_err(|e| {
            BankError::Storage(format!("No se pudo obtener el bloqueo de lectura: {}", e))
        })
    }

    fn write_guard(&self) -> BankResult<RwLockWriteGuard<'_, BankState>> {
        self.state.write().map_err(|e| {
            BankError::Storage(format!("No se pudo obtener el bloqueo de escritura: {}", e))
        })
    }

    /// Run a read-only selector against the current state
    pub fn read<R>(&self, f: impl FnOnce(&BankState) -> R) -> BankResult<R> {
        let state = self.read_guard()?;
        Ok(f(&state))
    }

    /// Clone the whole state
    pub fn snapshot(&self) -> BankResult<BankState> {
        self.read(BankState::clone)
    }

    /// Run a mutation as one critical section
    ///
    /// If `f` fails the state is restored to what it was before the call and
    /// nothing is audited. The audit batch is written before the lock is
    /// released; a failed write also restores the state.
    pub fn transact<R>(
        &self,
        f: impl FnOnce(&mut BankState, &mut AuditBatch) -> BankResult<R>,
    ) -> BankResult<R> {
        let mut batch = AuditBatch::new(self.audit.is_some());
        let mut state = self.write_guard()?;
        let backup = (*state).clone();

        let value = match f(&mut *state, &mut batch) {
            Ok(value) => value,
            Err(e) => {
                *state = backup;
                return Err(e);
            }
        };

        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log_batch(&batch.entries) {
                warn!(error = %e, "audit write failed, rolling back");
                *state = backup;
                return Err(e);
            }
        }

        Ok(value)
    }

    pub fn balance(&self) -> BankResult<Money> {
        self.read(|s| s.balance)
    }

    pub fn contacts(&self) -> BankResult<Vec<Contact>> {
        self.read(|s| s.contacts.clone())
    }

    pub fn envelopes(&self) -> BankResult<Vec<Envelope>> {
        self.read(|s| s.envelopes.clone())
    }

    pub fn automations(&self) -> BankResult<Vec<AutomationRule>> {
        self.read(|s| s.automations.clone())
    }

    pub fn transfers(&self) -> BankResult<Vec<TransferRecord>> {
        self.read(|s| s.transfers.clone())
    }

    pub fn recharges(&self) -> BankResult<Vec<RechargeRecord>> {
        self.read(|s| s.recharges.clone())
    }

    pub fn notifications(&self) -> BankResult<Vec<NotificationItem>> {
        self.read(|s| s.notifications.clone())
    }

    pub fn profile(&self) -> BankResult<UserProfile> {
        self.read(|s| s.profile.clone())
    }

    pub fn is_authenticated(&self) -> BankResult<bool> {
        self.read(|s| s.is_authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_store_is_seeded() {
        let store = BankStore::new(Settings::default());
        assert_eq!(store.balance().unwrap(), Money::from_units_cents(509_015, 40));
        assert_eq!(store.contacts().unwrap().len(), 3);
        assert!(store.audit_logger().is_none());
    }

    #[test]
    fn test_injected_state() {
        let settings = Settings::default();
        let mut state = seed_state(&settings);
        state.balance = Money::from_units(10);
        let store = BankStore::with_state(settings, state);
        assert_eq!(store.balance().unwrap(), Money::from_units(10));
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let store = BankStore::new(Settings::default());
        let result: BankResult<()> = store.transact(|state, _| {
            state.balance = Money::zero();
            state.contacts.clear();
            Err(BankError::Validation("abortado".into()))
        });

        assert!(result.is_err());
        assert_eq!(store.balance().unwrap(), Money::from_units_cents(509_015, 40));
        assert_eq!(store.contacts().unwrap().len(), 3);
    }

    #[test]
    fn test_transaction_writes_audit_batch() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilleteraPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            audit_enabled: true,
            ..Settings::default()
        };
        let store = BankStore::open(&paths, settings).unwrap();

        store
            .transact(|state, audit| {
                let before = state.balance;
                state.balance = Money::zero();
                audit.log_update(EntityType::Account, "saldo", None, &before, &state.balance, None);
                Ok(())
            })
            .unwrap();

        let entries = store.audit_logger().unwrap().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity_type, EntityType::Account);
    }

    #[test]
    fn test_failed_audit_write_rolls_back() {
        let temp_dir = TempDir::new().unwrap();
        let store = BankStore::new(Settings::default())
            .with_audit_logger(AuditLogger::new(temp_dir.path().to_path_buf()));

        let result = store.transact(|state, audit| {
            let before = state.balance;
            state.balance = Money::zero();
            audit.log_update(EntityType::Account, "saldo", None, &before, &state.balance, None);
            Ok(())
        });

        assert!(matches!(result, Err(BankError::Io(_))));
        assert_eq!(store.balance().unwrap(), Money::from_units_cents(509_015, 40));
    }

    #[test]
    fn test_store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BankStore>();
    }
}

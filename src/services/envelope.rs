//! Envelope service
//!
//! Provides business logic for envelopes: creation, updates, cascading
//! deletes and the allocation operation that moves envelope balances.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::envelope::palette_color;
use crate::models::{
    AllocationError, AllocationOutcome, Envelope, EnvelopeDraft, EnvelopeId, EnvelopeUpdate,
    EnvelopeUpdateReport, Money,
};
use crate::storage::{AuditBatch, BankState, BankStore};

/// Service for envelope management
pub struct EnvelopeService<'a> {
    store: &'a BankStore,
}

/// Tuning for a single allocation
#[derive(Debug, Clone, Default)]
pub struct AllocationOptions {
    /// Let the balance drop below zero
    pub allow_negative: bool,
    /// Free text recorded with the allocation
    pub label: Option<String>,
}

impl AllocationOptions {
    pub fn overdraft() -> Self {
        Self {
            allow_negative: true,
            label: None,
        }
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            allow_negative: false,
            label: Some(label.into()),
        }
    }
}

/// Totals across all envelopes
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeSummary {
    pub count: usize,
    pub total_balance: Money,
    pub total_target: Money,
    /// Envelopes whose balance reached their target
    pub completed: usize,
}

pub(crate) fn position(state: &BankState, id: EnvelopeId) -> BankResult<usize> {
    state
        .envelopes
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| BankError::envelope_not_found(id.to_string()))
}

/// Apply a signed amount to an envelope balance
///
/// Refusals leave the envelope untouched and come back as
/// `InsufficientEnvelopeFunds`.
pub(crate) fn apply_envelope_allocation(
    state: &mut BankState,
    audit: &mut AuditBatch,
    envelope_id: EnvelopeId,
    amount: Money,
    options: &AllocationOptions,
    at: DateTime<Utc>,
) -> BankResult<AllocationOutcome> {
    let index = position(state, envelope_id)?;
    let before = state.envelopes[index].clone();
    let envelope = &mut state.envelopes[index];

    let outcome = envelope
        .allocate(amount, options.allow_negative, at)
        .map_err(|e| match e {
            AllocationError::WouldOverdraw { needed, available } => {
                warn!(
                    envelope = %envelope_id,
                    %needed,
                    %available,
                    "allocation refused: balance would go negative"
                );
                BankError::InsufficientEnvelopeFunds {
                    envelope: before.name.clone(),
                    needed,
                    available,
                }
            }
            AllocationError::Overflow => BankError::Validation(e.to_string()),
        })?;

    if let AllocationOutcome::Applied { previous, balance } = outcome {
        let summary = match &options.label {
            Some(label) => format!("balance: {} -> {} ({})", previous, balance, label),
            None => format!("balance: {} -> {}", previous, balance),
        };
        audit.log_update(
            EntityType::Envelope,
            envelope_id.to_string(),
            Some(envelope.name.clone()),
            &before,
            &*envelope,
            Some(summary),
        );
        info!(envelope = %envelope_id, %amount, %balance, "envelope allocation applied");
    }

    Ok(outcome)
}

impl<'a> EnvelopeService<'a> {
    pub fn new(store: &'a BankStore) -> Self {
        Self { store }
    }

    /// Create an empty envelope
    pub fn create_envelope(&self, draft: EnvelopeDraft) -> BankResult<Envelope> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(BankError::Validation(
                "El nombre del sobre es obligatorio".into(),
            ));
        }

        self.store.transact(|state, audit| {
            let color = draft
                .color
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| palette_color(state.envelopes.len()).to_string());

            let mut envelope = Envelope::new(name, color);
            envelope.target_amount = draft.target_amount.filter(|t| t.is_positive());
            envelope.description = draft
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string);

            audit.log_create(
                EntityType::Envelope,
                envelope.id.to_string(),
                Some(envelope.name.clone()),
                &envelope,
            );
            state.envelopes.push(envelope.clone());
            Ok(envelope)
        })
    }

    /// Merge fields into an envelope
    ///
    /// Negative target or balance values keep the current value; the report
    /// lists which fields were ignored.
    pub fn update_envelope(
        &self,
        id: EnvelopeId,
        update: EnvelopeUpdate,
    ) -> BankResult<EnvelopeUpdateReport> {
        self.store.transact(|state, audit| {
            let index = position(state, id)?;
            let before = state.envelopes[index].clone();
            let ignored = update.apply_to(&mut state.envelopes[index], Utc::now());
            let envelope = state.envelopes[index].clone();

            if !ignored.is_empty() {
                warn!(envelope = %id, ?ignored, "envelope update ignored negative values");
            }
            audit.log_update(
                EntityType::Envelope,
                id.to_string(),
                Some(envelope.name.clone()),
                &before,
                &envelope,
                None,
            );
            Ok(EnvelopeUpdateReport { envelope, ignored })
        })
    }

    /// Delete an envelope and everything that points at it
    ///
    /// Automation rules feeding the envelope are removed; transfers linked to
    /// the envelope or to those rules lose both links.
    pub fn remove_envelope(&self, id: EnvelopeId) -> BankResult<Envelope> {
        self.store.transact(|state, audit| {
            let index = position(state, id)?;
            let removed = state.envelopes.remove(index);

            let (dropped, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.automations)
                .into_iter()
                .partition(|rule| rule.envelope_id == id);
            state.automations = kept;

            for transfer in state.transfers.iter_mut() {
                let linked_here = transfer.linked_envelope_id == Some(id);
                let via_dropped_rule = transfer
                    .automation_id
                    .is_some_and(|a| dropped.iter().any(|rule| rule.id == a));
                if linked_here || via_dropped_rule {
                    transfer.linked_envelope_id = None;
                    transfer.automation_id = None;
                }
            }

            for rule in &dropped {
                audit.log_delete(
                    EntityType::AutomationRule,
                    rule.id.to_string(),
                    Some(rule.title.clone()),
                    rule,
                );
            }
            audit.log_delete(
                EntityType::Envelope,
                removed.id.to_string(),
                Some(removed.name.clone()),
                &removed,
            );

            info!(
                envelope = %id,
                automations_removed = dropped.len(),
                "envelope removed"
            );
            Ok(removed)
        })
    }

    /// Deposit (positive) or withdraw (negative) money in an envelope
    pub fn allocate_to_envelope(
        &self,
        id: EnvelopeId,
        amount: Money,
        options: AllocationOptions,
    ) -> BankResult<AllocationOutcome> {
        self.store.transact(|state, audit| {
            apply_envelope_allocation(state, audit, id, amount, &options, Utc::now())
        })
    }

    pub fn get(&self, id: EnvelopeId) -> BankResult<Option<Envelope>> {
        self.store
            .read(|s| s.envelopes.iter().find(|e| e.id == id).cloned())
    }

    pub fn list(&self) -> BankResult<Vec<Envelope>> {
        self.store.envelopes()
    }

    /// Totals across envelopes; fails if a total does not fit in `Money`
    pub fn summary(&self) -> BankResult<EnvelopeSummary> {
        let too_large = || BankError::Validation("El total de los sobres es demasiado grande".into());
        self.store.read(|s| -> BankResult<EnvelopeSummary> {
            Ok(EnvelopeSummary {
                count: s.envelopes.len(),
                total_balance: Money::checked_sum(s.envelopes.iter().map(|e| e.balance))
                    .ok_or_else(too_large)?,
                total_target: Money::checked_sum(s.envelopes.iter().filter_map(|e| e.target_amount))
                    .ok_or_else(too_large)?,
                completed: s
                    .envelopes
                    .iter()
                    .filter(|e| e.progress_percent() == Some(100))
                    .count(),
            })
        })?
    }
}

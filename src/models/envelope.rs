//! Envelope model
//!
//! Envelopes are budget buckets that hold part of the money received. Their
//! balance only moves through allocations: positive amounts deposit,
//! negative amounts withdraw.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EnvelopeId;
use super::money::Money;

/// Colors assigned to new envelopes in rotation
pub const ENVELOPE_PALETTE: [&str; 6] = [
    "#2563EB", "#16A34A", "#DB2777", "#F59E0B", "#7C3AED", "#0891B2",
];

/// Deterministic palette color for the n-th envelope
pub fn palette_color(index: usize) -> &'static str {
    ENVELOPE_PALETTE[index % ENVELOPE_PALETTE.len()]
}

/// A budget bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: EnvelopeId,

    pub name: String,

    pub color: String,

    /// Money currently held; never negative unless an allocation opted in
    pub balance: Money,

    /// Savings goal, always positive when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// What an allocation did to an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// The balance moved
    Applied { previous: Money, balance: Money },
    /// Zero amount; nothing was touched
    Unchanged { balance: Money },
}

impl AllocationOutcome {
    /// Balance after the allocation
    pub fn balance(&self) -> Money {
        match self {
            Self::Applied { balance, .. } | Self::Unchanged { balance } => *balance,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Reasons an allocation is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationError {
    /// The balance would drop below zero
    WouldOverdraw { needed: Money, available: Money },
    /// The balance would not fit in the money type
    Overflow,
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldOverdraw { needed, available } => {
                write!(f, "Se requieren {}, disponible {}", needed, available)
            }
            Self::Overflow => write!(f, "El monto excede el máximo permitido"),
        }
    }
}

impl std::error::Error for AllocationError {}

impl Envelope {
    /// Create an empty envelope
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EnvelopeId::new(),
            name: name.into(),
            color: color.into(),
            balance: Money::zero(),
            target_amount: None,
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a signed allocation to the balance
    ///
    /// Zero is a no-op. A result below zero is refused unless
    /// `allow_negative` is set; a refused allocation leaves the envelope
    /// untouched.
    pub fn allocate(
        &mut self,
        amount: Money,
        allow_negative: bool,
        at: DateTime<Utc>,
    ) -> Result<AllocationOutcome, AllocationError> {
        if amount.is_zero() {
            return Ok(AllocationOutcome::Unchanged {
                balance: self.balance,
            });
        }

        let next = self
            .balance
            .checked_add(amount)
            .ok_or(AllocationError::Overflow)?;

        if next.is_negative() && !allow_negative {
            return Err(AllocationError::WouldOverdraw {
                needed: amount.abs(),
                available: self.balance,
            });
        }

        let previous = self.balance;
        self.balance = next;
        self.updated_at = at;

        Ok(AllocationOutcome::Applied {
            previous,
            balance: next,
        })
    }

    /// Progress toward the target in whole percent, capped at 100
    pub fn progress_percent(&self) -> Option<u8> {
        let target = self.target_amount.filter(|t| t.is_positive())?;
        if self.balance.is_negative() {
            return Some(0);
        }
        let pct = (self.balance.cents() as i128 * 100) / target.cents() as i128;
        Some(pct.min(100) as u8)
    }

    /// Money still missing to reach the target
    pub fn remaining_to_target(&self) -> Option<Money> {
        let target = self.target_amount?;
        // Only a deep overdraft overflows, and then the gap is unbounded
        let remaining = target
            .checked_sub(self.balance)
            .unwrap_or(Money::from_cents(i64::MAX));
        Some(remaining.max(Money::zero()))
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Input for creating an envelope
#[derive(Debug, Clone, Default)]
pub struct EnvelopeDraft {
    pub name: String,
    pub color: Option<String>,
    /// Kept only when positive
    pub target_amount: Option<Money>,
    pub description: Option<String>,
}

impl EnvelopeDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for an envelope
///
/// Negative `target_amount` or `balance` values are ignored and reported in
/// [`EnvelopeUpdateReport::ignored`]. A zero target clears the target.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub target_amount: Option<Money>,
    pub balance: Option<Money>,
    /// `Some("")` clears the description
    pub description: Option<String>,
}

/// Result of applying an [`EnvelopeUpdate`]
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeUpdateReport {
    pub envelope: Envelope,
    /// Fields whose new value was rejected and left as they were
    pub ignored: Vec<&'static str>,
}

impl EnvelopeUpdate {
    /// Merge into an envelope, returning the names of ignored fields
    pub fn apply_to(&self, envelope: &mut Envelope, at: DateTime<Utc>) -> Vec<&'static str> {
        let mut ignored = Vec::new();

        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            envelope.name = name.to_string();
        }
        if let Some(color) = self.color.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            envelope.color = color.to_string();
        }
        match self.target_amount {
            Some(t) if t.is_negative() => ignored.push("target_amount"),
            Some(t) if t.is_zero() => envelope.target_amount = None,
            Some(t) => envelope.target_amount = Some(t),
            None => {}
        }
        match self.balance {
            Some(b) if b.is_negative() => ignored.push("balance"),
            Some(b) => envelope.balance = b,
            None => {}
        }
        if let Some(description) = &self.description {
            let description = description.trim();
            envelope.description = if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            };
        }

        envelope.updated_at = at;
        ignored
    }
}

//! Transfer and recharge records
//!
//! Records are kept most-recent-first. A transfer remembers the envelope and
//! automation that routed it, when one did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AutomationId, EnvelopeId, RechargeId, TransferId};
use super::money::Money;

/// Direction of money relative to the account holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Inbound,
    Outbound,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inbound => write!(f, "Recibida"),
            Self::Outbound => write!(f, "Enviada"),
        }
    }
}

/// A transfer to or from a contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: TransferId,

    pub contact_name: String,

    /// Display phone
    pub phone: String,

    pub normalized_phone: String,

    /// Always positive; the direction carries the sign
    pub amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    pub created_at: DateTime<Utc>,

    pub direction: TransferDirection,

    /// Envelope credited by an automation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_envelope_id: Option<EnvelopeId>,

    /// Automation that routed this transfer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_id: Option<AutomationId>,
}

impl TransferRecord {
    pub fn is_inbound(&self) -> bool {
        self.direction == TransferDirection::Inbound
    }

    /// Amount with the sign seen by the account balance
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            TransferDirection::Inbound => self.amount,
            TransferDirection::Outbound => -self.amount,
        }
    }
}

/// Input for sending or receiving a transfer
#[derive(Debug, Clone, Default)]
pub struct TransferDraft {
    pub contact_name: String,
    pub phone: String,
    pub amount: Money,
    pub note: Option<String>,
}

impl TransferDraft {
    pub fn new(contact_name: impl Into<String>, phone: impl Into<String>, amount: Money) -> Self {
        Self {
            contact_name: contact_name.into(),
            phone: phone.into(),
            amount,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A mobile airtime recharge paid from the balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RechargeRecord {
    pub id: RechargeId,
    pub provider: String,
    pub phone: String,
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

/// Input for a recharge
#[derive(Debug, Clone, Default)]
pub struct RechargeDraft {
    pub provider: String,
    pub phone: String,
    pub amount: Money,
}

impl RechargeDraft {
    pub fn new(provider: impl Into<String>, phone: impl Into<String>, amount: Money) -> Self {
        Self {
            provider: provider.into(),
            phone: phone.into(),
            amount,
        }
    }
}

/// Keep only the first `limit` entries of a most-recent-first list
pub fn truncate_history<T>(items: &mut Vec<T>, limit: usize) {
    items.truncate(limit);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(direction: TransferDirection) -> TransferRecord {
        TransferRecord {
            id: TransferId::new(),
            contact_name: "Jefe".into(),
            phone: "8888-1212".into(),
            normalized_phone: "88881212".into(),
            amount: Money::from_units(5000),
            note: None,
            created_at: Utc::now(),
            direction,
            linked_envelope_id: None,
            automation_id: None,
        }
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(
            record(TransferDirection::Inbound).signed_amount(),
            Money::from_units(5000)
        );
        assert_eq!(
            record(TransferDirection::Outbound).signed_amount(),
            Money::from_units(-5000)
        );
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        let json = serde_json::to_string(&TransferDirection::Inbound).unwrap();
        assert_eq!(json, "\"inbound\"");
    }

    #[test]
    fn test_truncate_history_keeps_head() {
        let mut items: Vec<u32> = (0..35).collect();
        truncate_history(&mut items, 30);
        assert_eq!(items.len(), 30);
        assert_eq!(items[0], 0);
        assert_eq!(items[29], 29);
    }
}

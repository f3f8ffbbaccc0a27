//! Automation rule model
//!
//! An automation routes every inbound transfer from one phone number into an
//! envelope. Matching is done on the normalized phone only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AutomationId, EnvelopeId};

/// Title prefix used when a rule is created without one
pub const DEFAULT_TITLE_PREFIX: &str = "Automatización";

/// Routes inbound transfers from `normalized_phone` into `envelope_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    pub id: AutomationId,

    pub title: String,

    /// Phone as the user typed it
    pub match_phone: String,

    /// Digits-only form used for matching
    pub normalized_phone: String,

    pub envelope_id: EnvelopeId,

    pub active: bool,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered_at: Option<DateTime<Utc>>,
}

impl AutomationRule {
    /// Create an active rule
    pub fn new(
        title: impl Into<String>,
        match_phone: impl Into<String>,
        normalized_phone: impl Into<String>,
        envelope_id: EnvelopeId,
    ) -> Self {
        Self {
            id: AutomationId::new(),
            title: title.into(),
            match_phone: match_phone.into(),
            normalized_phone: normalized_phone.into(),
            envelope_id,
            active: true,
            created_at: Utc::now(),
            last_triggered_at: None,
        }
    }

    /// Default title for a rule feeding the named envelope
    pub fn default_title(envelope_name: &str) -> String {
        format!("{} {}", DEFAULT_TITLE_PREFIX, envelope_name)
    }

    /// Whether this rule fires for a transfer from `normalized_phone`
    pub fn matches(&self, normalized_phone: &str) -> bool {
        self.active && self.normalized_phone == normalized_phone
    }

    /// Whether this rule has ever routed money
    pub fn has_fired(&self) -> bool {
        self.last_triggered_at.is_some()
    }
}

impl fmt::Display for AutomationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Input for creating an automation rule
#[derive(Debug, Clone)]
pub struct AutomationDraft {
    pub title: Option<String>,
    pub match_phone: String,
    pub envelope_id: EnvelopeId,
    pub active: Option<bool>,
}

impl AutomationDraft {
    pub fn new(match_phone: impl Into<String>, envelope_id: EnvelopeId) -> Self {
        Self {
            title: None,
            match_phone: match_phone.into(),
            envelope_id,
            active: None,
        }
    }
}

/// Partial update for an automation rule
#[derive(Debug, Clone, Default)]
pub struct AutomationUpdate {
    pub title: Option<String>,
    pub match_phone: Option<String>,
    pub envelope_id: Option<EnvelopeId>,
    pub active: Option<bool>,
}

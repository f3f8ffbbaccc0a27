//! Contact model
//!
//! Contacts are identified by their normalized phone digits. The directory
//! keeps them in most-recently-used order, head first.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ContactId;
use super::phone::{format_phone, normalize_phone};

/// Avatar colors assigned at random to new contacts
pub const AVATAR_PALETTE: [&str; 8] = [
    "#F97316", "#0EA5E9", "#22C55E", "#A855F7", "#EF4444", "#14B8A6", "#EAB308", "#6366F1",
];

/// Pick a random avatar color from the palette
pub fn random_avatar_color() -> String {
    AVATAR_PALETTE
        .choose(&mut rand::thread_rng())
        .unwrap_or(&AVATAR_PALETTE[0])
        .to_string()
}

/// A person money can be sent to or received from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,

    pub name: String,

    /// Display form of the phone ("6000-1111")
    pub phone: String,

    pub avatar_color: String,

    #[serde(default)]
    pub favorite: bool,

    /// Last time money moved to or from this contact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Contact {
    /// Create a contact from a raw phone; the display phone is reformatted
    pub fn new(name: impl Into<String>, raw_phone: &str, avatar_color: impl Into<String>) -> Self {
        Self {
            id: ContactId::new(),
            name: name.into(),
            phone: format_phone(&normalize_phone(raw_phone)),
            avatar_color: avatar_color.into(),
            favorite: false,
            last_used_at: None,
        }
    }

    /// Digits-only phone used for identity
    pub fn normalized_phone(&self) -> String {
        normalize_phone(&self.phone)
    }

    /// Check identity against a raw or normalized phone
    pub fn has_phone(&self, raw_phone: &str) -> bool {
        self.normalized_phone() == normalize_phone(raw_phone)
    }

    /// Mark the contact as just used
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_used_at = Some(at);
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.phone)
    }
}

/// Input for adding (or upserting) a contact
#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub avatar_color: Option<String>,
    pub favorite: Option<bool>,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a contact; blank strings are ignored
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_color: Option<String>,
    pub favorite: Option<bool>,
}

impl ContactUpdate {
    /// Apply the update, keeping existing values for blank inputs
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(name) = non_blank(self.name.as_deref()) {
            contact.name = name.to_string();
        }
        if let Some(phone) = non_blank(self.phone.as_deref()) {
            let digits = normalize_phone(phone);
            if !digits.is_empty() {
                contact.phone = format_phone(&digits);
            }
        }
        if let Some(color) = non_blank(self.avatar_color.as_deref()) {
            contact.avatar_color = color.to_string();
        }
        if let Some(favorite) = self.favorite {
            contact.favorite = favorite;
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

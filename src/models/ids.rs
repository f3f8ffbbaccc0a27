//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time, e.g. passing an envelope id where an
//! automation rule id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short form shown to users ("env-1a2b3c4d")
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.simple().to_string()[..8])
            }

            /// Check whether a user-typed reference names this id
            ///
            /// Accepts the full UUID, the short form, or the bare 8-char prefix.
            pub fn matches(&self, reference: &str) -> bool {
                let reference = reference.trim();
                if let Ok(uuid) = Uuid::parse_str(reference) {
                    return uuid == self.0;
                }
                let bare = reference.strip_prefix($display_prefix).unwrap_or(reference);
                bare.len() >= 4 && self.0.simple().to_string().starts_with(&bare.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(ContactId, "con-");
define_id!(EnvelopeId, "env-");
define_id!(AutomationId, "aut-");
define_id!(TransferId, "trf-");
define_id!(RechargeId, "rec-");
define_id!(NotificationId, "not-");

//! Notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::NotificationId;

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Transfer,
    Recharge,
    Security,
    #[default]
    General,
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => write!(f, "Transferencia"),
            Self::Recharge => write!(f, "Recarga"),
            Self::Security => write!(f, "Seguridad"),
            Self::General => write!(f, "General"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub category: NotificationCategory,
}

impl NotificationItem {
    /// Create an unread notification
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        category: NotificationCategory,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            title: title.into(),
            message: message.into(),
            timestamp,
            read: false,
            category,
        }
    }
}

/// Input for pushing a notification
#[derive(Debug, Clone, Default)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
}

impl NotificationDraft {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        category: NotificationCategory,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_unread() {
        let n = NotificationItem::new("Hola", "Bienvenido", NotificationCategory::General, Utc::now());
        assert!(!n.read);
        assert_eq!(n.category, NotificationCategory::General);
    }

    #[test]
    fn test_category_defaults_when_missing() {
        let json = format!(
            r#"{{"id":"{}","title":"t","message":"m","timestamp":"2025-01-15T10:00:00Z"}}"#,
            uuid::Uuid::new_v4()
        );
        let n: NotificationItem = serde_json::from_str(&json).unwrap();
        assert_eq!(n.category, NotificationCategory::General);
        assert!(!n.read);
    }
}

//! Notification service
//!
//! Plain CRUD over a capped, most-recent-first list.

use chrono::{DateTime, Utc};

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::{NotificationDraft, NotificationId, NotificationItem};
use crate::storage::{AuditBatch, BankState, BankStore};

/// Service for the notification inbox
pub struct NotificationService<'a> {
    store: &'a BankStore,
}

/// Push a notification at the head of the list and drop the overflow
pub(crate) fn push_notification(
    state: &mut BankState,
    audit: &mut AuditBatch,
    limit: usize,
    draft: NotificationDraft,
    at: DateTime<Utc>,
) -> NotificationItem {
    let item = NotificationItem::new(draft.title, draft.message, draft.category, at);
    audit.log_create(
        EntityType::Notification,
        item.id.to_string(),
        Some(item.title.clone()),
        &item,
    );
    state.notifications.insert(0, item.clone());
    state.notifications.truncate(limit);
    item
}

fn find_mut(state: &mut BankState, id: NotificationId) -> BankResult<&mut NotificationItem> {
    state
        .notifications
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| BankError::notification_not_found(id.to_string()))
}

impl<'a> NotificationService<'a> {
    pub fn new(store: &'a BankStore) -> Self {
        Self { store }
    }

    /// Add an unread notification
    pub fn add_notification(&self, draft: NotificationDraft) -> BankResult<NotificationItem> {
        if draft.title.trim().is_empty() {
            return Err(BankError::Validation(
                "La notificación necesita un título".into(),
            ));
        }
        let limit = self.store.settings().notification_limit;
        self.store
            .transact(|state, audit| Ok(push_notification(state, audit, limit, draft, Utc::now())))
    }

    pub fn mark_notification_read(&self, id: NotificationId) -> BankResult<()> {
        self.store.transact(|state, _| {
            find_mut(state, id)?.read = true;
            Ok(())
        })
    }

    /// Flip the read flag, returning the new value
    pub fn toggle_notification_read(&self, id: NotificationId) -> BankResult<bool> {
        self.store.transact(|state, _| {
            let item = find_mut(state, id)?;
            item.read = !item.read;
            Ok(item.read)
        })
    }

    /// Mark everything read, returning how many changed
    pub fn mark_all_notifications_read(&self) -> BankResult<usize> {
        self.store.transact(|state, _| {
            let mut changed = 0;
            for item in state.notifications.iter_mut().filter(|n| !n.read) {
                item.read = true;
                changed += 1;
            }
            Ok(changed)
        })
    }

    /// Remove every notification, returning how many were removed
    pub fn clear_notifications(&self) -> BankResult<usize> {
        self.store.transact(|state, audit| {
            for item in &state.notifications {
                audit.log_delete(
                    EntityType::Notification,
                    item.id.to_string(),
                    Some(item.title.clone()),
                    item,
                );
            }
            let removed = state.notifications.len();
            state.notifications.clear();
            Ok(removed)
        })
    }

    pub fn list(&self) -> BankResult<Vec<NotificationItem>> {
        self.store.notifications()
    }

    pub fn unread_count(&self) -> BankResult<usize> {
        self.store
            .read(|s| s.notifications.iter().filter(|n| !n.read).count())
    }
}

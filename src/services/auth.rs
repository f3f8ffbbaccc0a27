//! Session service
//!
//! Login only checks that the payload is well formed; it is not an
//! authentication system.

use chrono::Utc;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BankError, BankResult};
use crate::models::phone::format_phone;
use crate::models::{
    normalize_phone, LoginPayload, NotificationCategory, NotificationDraft, UserProfile,
};
use crate::storage::{reset_ledger, BankStore};

use super::notification::push_notification;
use super::transfer::dialable_phone;

/// Service for login and logout
pub struct AuthService<'a> {
    store: &'a BankStore,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a BankStore) -> Self {
        Self { store }
    }

    /// Start a session and update the profile
    pub fn login(&self, payload: LoginPayload) -> BankResult<UserProfile> {
        let id = payload.id.trim();
        if id.is_empty() {
            return Err(BankError::Validation(
                "Ingrese su número de identificación".into(),
            ));
        }
        if payload.phone.trim().is_empty() {
            return Err(BankError::Validation("Ingrese su número de teléfono".into()));
        }
        let digits = dialable_phone(&payload.phone)?;
        let limit = self.store.settings().notification_limit;

        self.store.transact(|state, audit| {
            let before = state.profile.clone();
            let profile = &mut state.profile;
            profile.id = id.to_string();
            profile.phone = format_phone(&digits);
            if let Some(name) = payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                profile.name = name.to_string();
            }
            if let Some(id_type) = payload.id_type {
                profile.id_type = id_type;
            }
            let profile = profile.clone();
            state.is_authenticated = true;

            audit.log_update(
                EntityType::Session,
                profile.id.clone(),
                Some(profile.name.clone()),
                &before,
                &profile,
                Some("inicio de sesión".to_string()),
            );
            push_notification(
                state,
                audit,
                limit,
                NotificationDraft::new(
                    "Inicio de sesión",
                    format!("Nuevo inicio de sesión desde {}", profile.phone),
                    NotificationCategory::Security,
                ),
                Utc::now(),
            );

            info!(phone = %normalize_phone(&profile.phone), "session started");
            Ok(profile)
        })
    }

    /// End the session and return the ledger to its seeded state
    ///
    /// The profile and biometric registration survive.
    pub fn logout(&self) -> BankResult<()> {
        let settings = self.store.settings();
        self.store.transact(|state, audit| {
            let was_authenticated = state.is_authenticated;
            reset_ledger(state, settings);
            audit.log_update(
                EntityType::Session,
                state.profile.id.clone(),
                Some(state.profile.name.clone()),
                &was_authenticated,
                &state.is_authenticated,
                Some("cierre de sesión".to_string()),
            );
            info!("session ended, ledger reset");
            Ok(())
        })
    }

    pub fn is_authenticated(&self) -> BankResult<bool> {
        self.store.is_authenticated()
    }

    pub fn profile(&self) -> BankResult<UserProfile> {
        self.store.profile()
    }

    /// Fail with `NotAuthenticated` outside a session
    pub fn require_session(&self) -> BankResult<()> {
        if self.is_authenticated()? {
            Ok(())
        } else {
            Err(BankError::NotAuthenticated)
        }
    }
}

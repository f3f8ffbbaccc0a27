//! Biometric validation simulation
//!
//! Resolves after a randomized delay to success, mismatch or timeout. The
//! wait can be cancelled through a [`BiometricCancel`] handle; a cancelled
//! run records nothing.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::BankResult;
use crate::models::{
    BiometricAttempt, BiometricOptions, BiometricOutcome, BiometricStatus, NotificationCategory,
    NotificationDraft,
};
use crate::storage::BankStore;

use super::notification::push_notification;

/// Cancellation handle for a pending validation
///
/// Clones share the same flag.
#[derive(Debug, Clone)]
pub struct BiometricCancel {
    sender: Arc<watch::Sender<bool>>,
}

impl BiometricCancel {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Default for BiometricCancel {
    fn default() -> Self {
        Self::new()
    }
}

/// Service for the simulated biometric check
pub struct BiometricService<'a> {
    store: &'a BankStore,
}

/// Latency and status for one run, rolled up front
fn roll(options: &BiometricOptions) -> (u64, BiometricStatus) {
    let mut rng = rand::thread_rng();
    let jitter = rng.gen_range(0..=options.jitter_ms);
    let status = options.force.unwrap_or_else(|| {
        BiometricStatus::from_roll(rng.gen::<f64>(), options.success_rate, options.timeout_rate)
    });
    (options.min_delay_ms.saturating_add(jitter), status)
}

impl<'a> BiometricService<'a> {
    pub fn new(store: &'a BankStore) -> Self {
        Self { store }
    }

    /// Run one validation with the configured options
    pub async fn validate(&self) -> BankResult<BiometricOutcome> {
        let options = self.store.settings().biometric.clone();
        self.simulate_biometric_validation(&options, &BiometricCancel::new())
            .await
    }

    /// Wait out the simulated latency, then record the attempt
    ///
    /// Never fails for mismatches or timeouts; those are outcomes. Success
    /// marks the user as biometrically registered.
    pub async fn simulate_biometric_validation(
        &self,
        options: &BiometricOptions,
        cancel: &BiometricCancel,
    ) -> BankResult<BiometricOutcome> {
        let (latency_ms, status) = roll(options);
        let started_at = Utc::now();
        let mut cancelled = cancel.subscribe();

        if cancel.is_cancelled() {
            return Ok(BiometricOutcome::Cancelled);
        }

        debug!(latency_ms, "biometric validation started");
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(latency_ms)) => {}
            _ = cancelled.wait_for(|flag| *flag) => {
                debug!("biometric validation cancelled");
                return Ok(BiometricOutcome::Cancelled);
            }
        }

        let attempt = BiometricAttempt {
            status,
            started_at,
            completed_at: Utc::now(),
            latency_ms,
        };

        let settings = self.store.settings();
        self.store.transact(|state, audit| {
            state.biometric_attempts.insert(0, attempt.clone());
            state
                .biometric_attempts
                .truncate(settings.biometric_history_limit);

            if status == BiometricStatus::Success {
                let was_registered = state.biometric_registered;
                state.biometric_registered = true;
                if !was_registered {
                    audit.log_update(
                        EntityType::Session,
                        state.profile.id.clone(),
                        Some(state.profile.name.clone()),
                        &was_registered,
                        &state.biometric_registered,
                        Some("biometría registrada".to_string()),
                    );
                    push_notification(
                        state,
                        audit,
                        settings.notification_limit,
                        NotificationDraft::new(
                            "Biometría activada",
                            "Tu huella quedó registrada para confirmar operaciones",
                            NotificationCategory::Security,
                        ),
                        attempt.completed_at,
                    );
                }
            }
            Ok(())
        })?;

        info!(%status, latency_ms, "biometric validation finished");
        Ok(BiometricOutcome::Completed(attempt))
    }

    /// Recorded attempts, most recent first
    pub fn attempts(&self) -> BankResult<Vec<BiometricAttempt>> {
        self.store.read(|s| s.biometric_attempts.clone())
    }

    pub fn is_registered(&self) -> BankResult<bool> {
        self.store.read(|s| s.biometric_registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn options() -> BiometricOptions {
        BiometricOptions::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_registers() {
        let store = BankStore::new(Settings::default());
        let service = BiometricService::new(&store);
        let start = tokio::time::Instant::now();

        let outcome = service
            .simulate_biometric_validation(
                &options().forced(BiometricStatus::Success),
                &BiometricCancel::new(),
            )
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert!(start.elapsed() >= Duration::from_millis(400));
        assert!(service.is_registered().unwrap());
        assert_eq!(service.attempts().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mismatch_and_timeout_do_not_register() {
        let store = BankStore::new(Settings::default());
        let service = BiometricService::new(&store);

        for status in [BiometricStatus::Mismatch, BiometricStatus::Timeout] {
            let outcome = service
                .simulate_biometric_validation(&options().forced(status), &BiometricCancel::new())
                .await
                .unwrap();
            match outcome {
                BiometricOutcome::Completed(attempt) => assert_eq!(attempt.status, status),
                BiometricOutcome::Cancelled => panic!("validation should complete"),
            }
        }

        assert!(!service.is_registered().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_within_bounds() {
        let store = BankStore::new(Settings::default());
        let service = BiometricService::new(&store);

        let outcome = service
            .simulate_biometric_validation(&options(), &BiometricCancel::new())
            .await
            .unwrap();

        let BiometricOutcome::Completed(attempt) = outcome else {
            panic!("validation should complete");
        };
        assert!((400..=1000).contains(&attempt.latency_ms));
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_is_capped() {
        let store = BankStore::new(Settings::default());
        let service = BiometricService::new(&store);
        let forced = options().forced(BiometricStatus::Mismatch);

        for _ in 0..7 {
            service
                .simulate_biometric_validation(&forced, &BiometricCancel::new())
                .await
                .unwrap();
        }

        assert_eq!(service.attempts().unwrap().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_delay_records_nothing() {
        let store = BankStore::new(Settings::default());
        let service = BiometricService::new(&store);
        let cancel = BiometricCancel::new();
        let forced = options().forced(BiometricStatus::Success);

        let (outcome, _) = tokio::join!(
            service.simulate_biometric_validation(&forced, &cancel),
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                cancel.cancel();
            }
        );

        assert_eq!(outcome.unwrap(), BiometricOutcome::Cancelled);
        assert!(service.attempts().unwrap().is_empty());
        assert!(!service.is_registered().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled() {
        let store = BankStore::new(Settings::default());
        let service = BiometricService::new(&store);
        let cancel = BiometricCancel::new();
        cancel.clone().cancel();

        let outcome = service
            .simulate_biometric_validation(&options(), &cancel)
            .await
            .unwrap();
        assert_eq!(outcome, BiometricOutcome::Cancelled);
    }
}

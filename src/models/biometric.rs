//! Biometric validation attempts
//!
//! The validation is simulated: it never fails with an error. Mismatches and
//! timeouts are ordinary outcomes carried in [`BiometricStatus`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiometricStatus {
    Success,
    Mismatch,
    Timeout,
}

impl BiometricStatus {
    /// Pick a status from a uniform roll in `[0, 1)`
    pub fn from_roll(roll: f64, success_rate: f64, timeout_rate: f64) -> Self {
        if roll < success_rate {
            Self::Success
        } else if roll < success_rate + timeout_rate {
            Self::Timeout
        } else {
            Self::Mismatch
        }
    }
}

impl fmt::Display for BiometricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "validación exitosa"),
            Self::Mismatch => write!(f, "la huella no coincide"),
            Self::Timeout => write!(f, "tiempo de espera agotado"),
        }
    }
}

/// One completed validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricAttempt {
    pub status: BiometricStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Simulated latency in milliseconds
    pub latency_ms: u64,
}

/// Tuning for one simulated validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricOptions {
    /// Minimum simulated latency
    pub min_delay_ms: u64,
    /// Upper bound of the random latency added on top of the minimum
    pub jitter_ms: u64,
    pub success_rate: f64,
    pub timeout_rate: f64,
    /// Skip the roll and resolve with this status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<BiometricStatus>,
}

impl Default for BiometricOptions {
    fn default() -> Self {
        Self {
            min_delay_ms: 400,
            jitter_ms: 600,
            success_rate: 0.8,
            timeout_rate: 0.1,
            force: None,
        }
    }
}

impl BiometricOptions {
    /// Same options, resolving to a fixed status
    pub fn forced(mut self, status: BiometricStatus) -> Self {
        self.force = Some(status);
        self
    }
}

/// How a simulated validation ended
#[derive(Debug, Clone, PartialEq)]
pub enum BiometricOutcome {
    /// The delay elapsed and the attempt was recorded
    Completed(BiometricAttempt),
    /// The caller cancelled before the delay elapsed; nothing was recorded
    Cancelled,
}

impl BiometricOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(a) if a.status == BiometricStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_roll_bands() {
        assert_eq!(BiometricStatus::from_roll(0.0, 0.8, 0.1), BiometricStatus::Success);
        assert_eq!(BiometricStatus::from_roll(0.85, 0.8, 0.1), BiometricStatus::Timeout);
        assert_eq!(BiometricStatus::from_roll(0.95, 0.8, 0.1), BiometricStatus::Mismatch);
    }

    #[test]
    fn test_default_min_delay() {
        assert_eq!(BiometricOptions::default().min_delay_ms, 400);
    }

    #[test]
    fn test_cancelled_is_not_success() {
        assert!(!BiometricOutcome::Cancelled.is_success());
    }
}

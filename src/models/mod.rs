//! Core data models for Billetera
//!
//! This module contains the data structures held by the ledger store:
//! contacts, envelopes, automation rules, transfer and recharge records,
//! notifications, the user profile and biometric attempts.

pub mod automation;
pub mod biometric;
pub mod contact;
pub mod envelope;
pub mod ids;
pub mod money;
pub mod notification;
pub mod phone;
pub mod profile;
pub mod transfer;

pub use automation::{AutomationDraft, AutomationRule, AutomationUpdate};
pub use biometric::{BiometricAttempt, BiometricOptions, BiometricOutcome, BiometricStatus};
pub use contact::{Contact, ContactDraft, ContactUpdate};
pub use envelope::{
    AllocationError, AllocationOutcome, Envelope, EnvelopeDraft, EnvelopeUpdate,
    EnvelopeUpdateReport,
};
pub use ids::{AutomationId, ContactId, EnvelopeId, NotificationId, RechargeId, TransferId};
pub use money::Money;
pub use notification::{NotificationCategory, NotificationDraft, NotificationItem};
pub use phone::{format_phone, normalize_phone};
pub use profile::{IdType, LoginPayload, UserProfile};
pub use transfer::{
    RechargeDraft, RechargeRecord, TransferDirection, TransferDraft, TransferRecord,
};

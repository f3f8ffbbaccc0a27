//! Service layer for Billetera
//!
//! The service layer provides the store actions on top of `BankStore`,
//! handling validation, cross-entity effects such as automation firing, and
//! audit logging. Each service borrows the store; multi-step operations run
//! inside a single `BankStore::transact` call.

pub mod auth;
pub mod automation;
pub mod biometric;
pub mod contact;
pub mod envelope;
pub mod notification;
pub mod recharge;
pub mod transfer;

pub use auth::AuthService;
pub use automation::{AutomationFiring, AutomationService};
pub use biometric::{BiometricCancel, BiometricService};
pub use contact::ContactService;
pub use envelope::{AllocationOptions, EnvelopeService, EnvelopeSummary};
pub use notification::NotificationService;
pub use recharge::RechargeService;
pub use transfer::{ReceivedTransfer, TransferService};

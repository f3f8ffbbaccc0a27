//! Audit trail for Billetera
//!
//! Records every create, update and delete performed on the ledger store with
//! before/after snapshots, in an append-only JSONL file.
//!
//! - `AuditEntry`: one operation on one entity.
//! - `AuditLogger`: appends entries to the log file and reads them back.
//! - `generate_diff`: one-line summary of changed fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use billetera::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Envelope,
//!     envelope.id.to_string(),
//!     Some(envelope.name.clone()),
//!     &envelope,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;

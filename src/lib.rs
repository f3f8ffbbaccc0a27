//! Billetera - in-memory ledger for a mobile banking wallet
//!
//! This library holds the account balance, the contact directory, budget
//! envelopes, automation rules that route inbound transfers into envelopes,
//! transfer and recharge history, notifications, and a simulated biometric
//! check.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory and settings management
//! - `error`: Custom error types
//! - `models`: Core data models (contacts, envelopes, transfers, etc.)
//! - `storage`: `BankStore`, the locked in-memory state
//! - `services`: Store actions and cross-entity rules
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Line-driven session commands
//!
//! # Example
//!
//! ```rust,ignore
//! use billetera::config::Settings;
//! use billetera::models::{Money, TransferDraft};
//! use billetera::services::TransferService;
//! use billetera::storage::BankStore;
//!
//! let store = BankStore::new(Settings::default());
//! TransferService::new(&store)
//!     .send_transfer(TransferDraft::new("Ana", "6000-1111", Money::from_units(1000)))?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BankError, BankResult};

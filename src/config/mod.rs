//! Configuration module for Billetera
//!
//! - data directory resolution
//! - user settings persistence

pub mod paths;
pub mod settings;

pub use paths::BilleteraPaths;
pub use settings::Settings;

//! Path management for Billetera
//!
//! The ledger itself lives in memory; the data directory only holds the
//! settings file and the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `BILLETERA_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/billetera` or `~/.config/billetera`
//! 3. Windows: `%APPDATA%\billetera`

use std::path::PathBuf;

use crate::error::BankError;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "BILLETERA_DATA_DIR";

/// Manages all paths used by Billetera
#[derive(Debug, Clone)]
pub struct BilleteraPaths {
    base_dir: PathBuf,
}

impl BilleteraPaths {
    /// Resolve the data directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, BankError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), BankError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            BankError::Io(format!("No se pudo crear el directorio de datos: {}", e))
        })
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BankError> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("billetera"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| BankError::Config("No se pudo determinar el directorio HOME".into()))?;
    Ok(PathBuf::from(home).join(".config").join("billetera"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BankError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BankError::Config("No se pudo determinar el directorio APPDATA".into()))?;
    Ok(PathBuf::from(appdata).join("billetera"))
}

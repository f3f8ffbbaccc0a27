//! User settings for Billetera
//!
//! Controls the seeded opening balance, history limits, the biometric
//! simulation and whether mutations are written to the audit log.

use serde::{Deserialize, Serialize};

use super::paths::BilleteraPaths;
use crate::error::BankError;
use crate::models::money::DEFAULT_CURRENCY_SYMBOL;
use crate::models::{BiometricOptions, Money};

/// User settings for Billetera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Account balance seeded at startup and after logout
    #[serde(default = "default_opening_balance")]
    pub opening_balance: Money,

    #[serde(default = "default_transfer_limit")]
    pub transfer_history_limit: usize,

    #[serde(default = "default_recharge_limit")]
    pub recharge_history_limit: usize,

    #[serde(default = "default_notification_limit")]
    pub notification_limit: usize,

    #[serde(default = "default_biometric_limit")]
    pub biometric_history_limit: usize,

    /// Contacts created from usage become favorites while the directory is
    /// smaller than this
    #[serde(default = "default_favorite_threshold")]
    pub favorite_bootstrap_threshold: usize,

    /// Append every mutation to the audit log
    #[serde(default)]
    pub audit_enabled: bool,

    #[serde(default)]
    pub biometric: BiometricOptions,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_opening_balance() -> Money {
    Money::from_units_cents(509_015, 40)
}

fn default_transfer_limit() -> usize {
    30
}

fn default_recharge_limit() -> usize {
    20
}

fn default_notification_limit() -> usize {
    30
}

fn default_biometric_limit() -> usize {
    5
}

fn default_favorite_threshold() -> usize {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            opening_balance: default_opening_balance(),
            transfer_history_limit: default_transfer_limit(),
            recharge_history_limit: default_recharge_limit(),
            notification_limit: default_notification_limit(),
            biometric_history_limit: default_biometric_limit(),
            favorite_bootstrap_threshold: default_favorite_threshold(),
            audit_enabled: false,
            biometric: BiometricOptions::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &BilleteraPaths) -> Result<Self, BankError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
            BankError::Io(format!("No se pudo leer el archivo de configuración: {}", e))
        })?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            BankError::Config(format!("Archivo de configuración inválido: {}", e))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BilleteraPaths) -> Result<(), BankError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BankError::Config(format!("No se pudo serializar la configuración: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BankError::Io(format!("No se pudo escribir la configuración: {}", e))
        })?;

        Ok(())
    }

    /// Reject settings the store cannot run with
    pub fn validate(&self) -> Result<(), BankError> {
        if self.opening_balance.is_negative() {
            return Err(BankError::Config(
                "El saldo inicial no puede ser negativo".into(),
            ));
        }
        let rates = [self.biometric.success_rate, self.biometric.timeout_rate];
        if rates.iter().any(|r| !(0.0..=1.0).contains(r))
            || self.biometric.success_rate + self.biometric.timeout_rate > 1.0
        {
            return Err(BankError::Config(
                "Las tasas biométricas deben estar entre 0 y 1 y sumar como máximo 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.opening_balance.cents(), 50_901_540);
        assert_eq!(settings.transfer_history_limit, 30);
        assert_eq!(settings.recharge_history_limit, 20);
        assert_eq!(settings.notification_limit, 30);
        assert_eq!(settings.biometric_history_limit, 5);
        assert!(!settings.audit_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilleteraPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            audit_enabled: true,
            opening_balance: Money::from_units(1000),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"audit_enabled": true}"#).unwrap();
        assert!(settings.audit_enabled);
        assert_eq!(settings.currency_symbol, "₡");
        assert_eq!(settings.biometric.min_delay_ms, 400);
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let mut settings = Settings::default();
        settings.biometric.success_rate = 0.95;
        settings.biometric.timeout_rate = 0.1;
        assert!(matches!(settings.validate(), Err(BankError::Config(_))));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BilleteraPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ not json").unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(BankError::Config(_))
        ));
    }
}

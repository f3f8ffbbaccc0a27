//! Custom error types for Billetera
//!
//! This module defines the error hierarchy for the ledger store using
//! thiserror. Messages are user-facing and written in Spanish, since they are
//! shown verbatim by the app.

use thiserror::Error;

use crate::models::Money;

/// The main error type for Billetera operations
#[derive(Error, Debug)]
pub enum BankError {
    /// Configuration-related errors
    #[error("Error de configuración: {0}")]
    Config(String),

    /// File I/O errors
    #[error("Error de E/S: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("Error de JSON: {0}")]
    Json(String),

    /// Validation errors for drafts and updates
    #[error("{0}")]
    Validation(String),

    /// Phone number that normalizes to nothing usable
    #[error("Número de teléfono inválido: '{0}'")]
    InvalidPhone(String),

    /// Entity not found errors
    #[error("{entity_type} no encontrado: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} ya existe: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Account balance cannot cover an outgoing amount
    #[error("Saldo insuficiente: se requieren {needed}, disponible {available}")]
    InsufficientFunds { needed: Money, available: Money },

    /// Envelope balance would go negative
    #[error("Fondos insuficientes en el sobre '{envelope}': se requieren {needed}, disponible {available}")]
    InsufficientEnvelopeFunds {
        envelope: String,
        needed: Money,
        available: Money,
    },

    /// Operation requires a logged-in session
    #[error("Debe iniciar sesión para continuar")]
    NotAuthenticated,

    /// Storage errors (poisoned locks, etc.)
    #[error("Error de almacenamiento: {0}")]
    Storage(String),
}

impl BankError {
    /// Create a "not found" error for contacts
    pub fn contact_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Contacto",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for envelopes
    pub fn envelope_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Sobre",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for automation rules
    pub fn automation_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Automatización",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for notifications
    pub fn notification_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Notificación",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidPhone(_))
    }

    /// Check if this error was caused by a balance that cannot cover an amount
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds { .. } | Self::InsufficientEnvelopeFunds { .. }
        )
    }
}

impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Billetera operations
pub type BankResult<T> = Result<T, BankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BankError::Config("archivo dañado".into());
        assert_eq!(err.to_string(), "Error de configuración: archivo dañado");
    }

    #[test]
    fn test_not_found_error() {
        let err = BankError::envelope_not_found("env-1234abcd");
        assert_eq!(err.to_string(), "Sobre no encontrado: env-1234abcd");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insufficient_funds_error() {
        let err = BankError::InsufficientFunds {
            needed: Money::from_cents(500_000),
            available: Money::from_cents(300_000),
        };
        assert_eq!(
            err.to_string(),
            "Saldo insuficiente: se requieren ₡5,000.00, disponible ₡3,000.00"
        );
        assert!(err.is_insufficient_funds());
    }

    #[test]
    fn test_validation_predicates() {
        assert!(BankError::InvalidPhone("abc".into()).is_validation());
        assert!(BankError::Validation("monto".into()).is_validation());
        assert!(!BankError::NotAuthenticated.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BankError = io_err.into();
        assert!(matches!(err, BankError::Io(_)));
    }
}

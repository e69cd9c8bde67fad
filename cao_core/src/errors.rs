//! # Error Types
//!
//! Structured error types for cao_core. Every calculator page reports its
//! failures through [`CalcError`]; front ends display them with
//! [`CalcError::user_message`], which yields the literal `Erreur : <message>`
//! shown in place of the result.
//!
//! ## Example
//!
//! ```rust
//! use cao_core::errors::{CalcError, CalcResult};
//!
//! fn validate_bore(bore_mm: f64) -> CalcResult<()> {
//!     if bore_mm <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "d_cyl".to_string(),
//!             value: bore_mm.to_string(),
//!             reason: "L'alésage doit être positif".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = validate_bore(-3.0).unwrap_err();
//! assert!(err.user_message().starts_with("Erreur : "));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cao_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (not a number, out of range, zero divisor)
    #[error("Valeur invalide pour '{field}' : {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Champ obligatoire manquant : {field}")]
    MissingField { field: String },

    /// Material not found in the property table
    #[error("Matériau inconnu : {material_name}")]
    MaterialNotFound { material_name: String },

    /// Calculation failed (no admissible solution, degenerate geometry, ...)
    #[error("Calcul impossible : {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
        reason: String,
    },

    /// File I/O error
    #[error("Erreur fichier : {operation} sur '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Session file is locked by another user/process
    #[error("Fichier verrouillé : '{path}' est verrouillé par {locked_by} depuis {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Erreur de sérialisation : {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version incompatible : fichier {file_version}, attendu {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Erreur interne : {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(calculation_type: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Shorthand for a positive-value check failure.
    pub fn not_positive(field: impl Into<String>, value: f64) -> Self {
        CalcError::invalid_input(field, value.to_string(), "La valeur doit être strictement positive")
    }

    /// Text displayed in place of a result label.
    pub fn user_message(&self) -> String {
        format!("Erreur : {}", self)
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Ensure `value > 0`, naming the offending field otherwise.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::not_positive(field, value))
    }
}

/// Convert a safety tolerance in percent to a fraction in `[0, 1)`.
pub(crate) fn tolerance_fraction(field: &str, tolerance_pct: f64) -> CalcResult<f64> {
    if !(0.0..100.0).contains(&tolerance_pct) {
        return Err(CalcError::invalid_input(
            field,
            tolerance_pct.to_string(),
            "La tolérance de sécurité doit être dans [0, 100[ %",
        ));
    }
    Ok(tolerance_pct / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("d_cyl", "abc", "Nombre attendu");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::material_not_found("Unobtainium").error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_user_message_prefix() {
        let msg = CalcError::missing_field("puissance").user_message();
        assert_eq!(msg, "Erreur : Champ obligatoire manquant : puissance");
    }

    #[test]
    fn test_tolerance_bounds() {
        assert!((tolerance_fraction("tol", 20.0).unwrap() - 0.2).abs() < 1e-12);
        assert!(tolerance_fraction("tol", 100.0).is_err());
        assert!(tolerance_fraction("tol", -1.0).is_err());
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("x", 1.0).is_ok());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", f64::NAN).is_err());
    }
}

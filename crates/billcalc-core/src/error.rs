//! # Error Types
//!
//! Domain-specific error types for billcalc-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billcalc-core errors (this file)                                      │
//! │  ├── CoreError        - Bill construction failures                     │
//! │  ├── ValidationError  - Caller-side input checks (InvalidInput)        │
//! │  └── ConfigError      - Engine configuration loading                   │
//! │                                                                         │
//! │  NOT errors: arithmetic. Every total is a plain number; out-of-range   │
//! │  rates flow through the formulas untouched.                            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller's HTTP/API error           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field and value in messages
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Bill construction errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An invoice-level discount was supplied for a bill with no items.
    ///
    /// ## When This Occurs
    /// Only under [`EmptyBillPolicy::Reject`](crate::types::EmptyBillPolicy).
    /// The flat per-item share would be `amount / 0`.
    #[error("Cannot distribute additional discount {amount} across a bill with no items")]
    EmptyBillWithDiscount { amount: f64 },

    /// The bill has more items than the configured limit.
    #[error("Bill cannot have more than {max} items (got {count})")]
    TooManyItems { count: usize, max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error (wraps ConfigError).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The engine never raises these on its own while computing totals; they come
/// from the helpers in [`crate::validation`], which callers run on untrusted
/// request data before building line items.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    MustBeFinite { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    ///
    /// `min` is exclusive for rates (a rate of exactly -1 makes the
    /// VAT-stripping divisor zero); `max` is inclusive.
    #[error("{field} must be greater than {min} and at most {max} (got {value})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    /// Collection exceeds its maximum size.
    #[error("{field} cannot have more than {max} entries")]
    TooMany { field: String, max: usize },
}

impl ValidationError {
    /// Returns the name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::TooLong { field, .. }
            | ValidationError::MustBeFinite { field }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooMany { field, .. } => field,
        }
    }

    /// Prefixes the field name, e.g. `vat_rate` becomes `items[2].vat_rate`.
    pub fn within(mut self, prefix: &str) -> Self {
        let field = match &mut self {
            ValidationError::TooLong { field, .. }
            | ValidationError::MustBeFinite { field }
            | ValidationError::MustBeNonNegative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooMany { field, .. } => field,
        };
        *field = format!("{}.{}", prefix, field);
        self
    }
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::EmptyBillWithDiscount { amount: 20.0 };
        assert_eq!(
            err.to_string(),
            "Cannot distribute additional discount 20 across a bill with no items"
        );

        let err = CoreError::TooManyItems { count: 3, max: 2 };
        assert_eq!(err.to_string(), "Bill cannot have more than 2 items (got 3)");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBeFinite {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be a finite number");

        let err = ValidationError::OutOfRange {
            field: "vat_rate".to_string(),
            min: -1.0,
            max: 1.0,
            value: -1.5,
        };
        assert_eq!(
            err.to_string(),
            "vat_rate must be greater than -1 and at most 1 (got -1.5)"
        );
    }

    #[test]
    fn test_within_prefixes_field() {
        let err = ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        }
        .within("items[2]");
        assert_eq!(err.field(), "items[2].quantity");
        assert_eq!(err.to_string(), "items[2].quantity must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::TooMany {
            field: "items".to_string(),
            max: 10,
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_config_error_converts_to_core_error() {
        let config_err = ConfigError::Invalid("max_items must be greater than 0".into());
        let core_err: CoreError = config_err.into();
        assert!(matches!(core_err, CoreError::Config(_)));
    }
}

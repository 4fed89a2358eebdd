//! # Validation Module
//!
//! Caller-side input checks for bill data.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request decoding (caller)                                    │
//! │  ├── Types and required fields                                         │
//! │  └── Produces LineItem values                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (caller opts in)                                 │
//! │  ├── Finite numbers, non-negative quantity                             │
//! │  └── Rates in (-1, 1]: a rate of -1 zeroes the VAT divisor             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine arithmetic                                            │
//! │  └── No checks. Whatever gets here propagates through the formulas     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billcalc_core::types::Rate;
//! use billcalc_core::validation::{validate_quantity, validate_rate};
//!
//! validate_quantity(3.0).unwrap();
//! validate_rate("vat_rate", Rate::from_fraction(0.07)).unwrap();
//! assert!(validate_rate("vat_rate", Rate::from_fraction(-1.0)).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::Rate;
use crate::MAX_DESCRIPTION_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Exclusive lower bound for any rate.
pub const MIN_RATE_EXCLUSIVE: f64 = -1.0;

/// Inclusive upper bound for any rate (100%).
pub const MAX_RATE: f64 = 1.0;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a line item description.
///
/// Empty is fine; the field is informational. Length is counted in chars.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

fn ensure_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::MustBeFinite {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a quantity.
///
/// ## Rules
/// - Must be finite
/// - Must be zero or greater (fractional quantities are allowed: 1.5 hours)
pub fn validate_quantity(quantity: f64) -> ValidationResult<()> {
    ensure_finite("quantity", quantity)?;

    if quantity < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a plain amount such as an invoice-level discount or a VAT
/// adjustment. Only finiteness is required; both may be negative.
pub fn validate_amount(field: &str, value: f64) -> ValidationResult<()> {
    ensure_finite(field, value)
}

/// Validates a unit price or unit discount.
///
/// Negative values are allowed so credit lines can be expressed.
pub fn validate_unit_price(field: &str, value: f64) -> ValidationResult<()> {
    ensure_finite(field, value)
}

/// Validates a VAT or withholding tax rate.
///
/// ## Rules
/// - Must be finite
/// - Must be greater than -1 (`1 + rate` is the VAT-stripping divisor)
/// - Must be at most 1.0 (100%)
///
/// ## Example
/// ```rust
/// use billcalc_core::types::Rate;
/// use billcalc_core::validation::validate_rate;
///
/// assert!(validate_rate("vat_rate", Rate::zero()).is_ok());
/// assert!(validate_rate("vat_rate", Rate::from_fraction(1.0)).is_ok());
/// assert!(validate_rate("vat_rate", Rate::from_fraction(1.5)).is_err());
/// ```
pub fn validate_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    let value = rate.fraction();
    ensure_finite(field, value)?;

    if value <= MIN_RATE_EXCLUSIVE || value > MAX_RATE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: MIN_RATE_EXCLUSIVE,
            max: MAX_RATE,
            value,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of items on a bill.
pub fn validate_item_count(count: usize, max: usize) -> ValidationResult<()> {
    if count > max {
        return Err(ValidationError::TooMany {
            field: "items".to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

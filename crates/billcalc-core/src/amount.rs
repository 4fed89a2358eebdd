//! # Amount Module
//!
//! Provides the `Amount` type and the numeric helpers every bill formula is
//! built from.
//!
//! ## Why a Real-Number Amount?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE ENGINE WORKS ON SIGNED REAL NUMBERS                                │
//! │                                                                         │
//! │  107 incl. 7% VAT  →  107 / 1.07 = 100.000...                           │
//! │  20 discount over 2 items → 10 each → 10 / 1.07 = 9.345794...           │
//! │                                                                         │
//! │  Intermediate values are NEVER rounded. Storage precision (DECIMAL,    │
//! │  cents, ...) is the caller's concern; `round_to` exists only for       │
//! │  presenting a finished snapshot.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billcalc_core::amount::Amount;
//! use billcalc_core::types::Rate;
//!
//! let inclusive = Amount::new(107.0);
//! let base = inclusive.strip_vat(Some(Rate::from_fraction(0.07)));
//! assert!(base.approx_eq(Amount::new(100.0), 1e-9));
//!
//! // No rate: nothing to strip, nothing to charge
//! assert_eq!(inclusive.strip_vat(None), inclusive);
//! assert_eq!(inclusive.apply_rate(None), Amount::zero());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Amount Type
// =============================================================================

/// A signed monetary value.
///
/// ## Design Decisions
/// - **f64**: the formulas divide by `1 + rate`, so values are real numbers
/// - **Signed**: discounts larger than the price produce negative totals,
///   which are reported as-is
/// - **Single field tuple struct**: serializes as a bare JSON number
///
/// ## Where Amount is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.price_per_unit ──► base_price_per_unit ──► amount_before_vat │
/// │                                                           │             │
/// │  BillSummary.additional_discount_amount ──► per-item share┘             │
/// │                                                                         │
/// │  amount_before_vat ──► vat_amount ──► amount_after_vat ──► amount_due  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Amount(f64);

impl Amount {
    /// Creates an amount from a plain number.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Amount(value)
    }

    /// Returns the underlying number.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Amount(0.0)
    }

    /// Checks if the value is exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// Checks that the value is neither NaN nor infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Backs VAT out of a VAT-inclusive amount.
    ///
    /// `value / (1 + rate)` when a rate is present, the value unchanged when
    /// it is not. This is the one stripping rule used for unit prices, unit
    /// discounts and the invoice-level discount share.
    ///
    /// ## Example
    /// ```rust
    /// use billcalc_core::amount::Amount;
    /// use billcalc_core::types::Rate;
    ///
    /// let share = Amount::new(10.0).strip_vat(Some(Rate::from_fraction(0.07)));
    /// assert!(share.approx_eq(Amount::new(9.345794392523365), 1e-12));
    /// ```
    #[inline]
    pub fn strip_vat(&self, rate: Option<Rate>) -> Amount {
        match rate {
            Some(rate) => Amount(self.0 / rate.multiplier()),
            None => *self,
        }
    }

    /// Applies a rate: `value × rate`, or exactly zero when no rate is set.
    #[inline]
    pub fn apply_rate(&self, rate: Option<Rate>) -> Amount {
        match rate {
            Some(rate) => Amount(self.0 * rate.fraction()),
            None => Amount::zero(),
        }
    }

    /// Rounds half away from zero to `scale` decimal places.
    ///
    /// ## Example
    /// ```rust
    /// use billcalc_core::amount::Amount;
    ///
    /// assert_eq!(Amount::new(181.30841121).round_to(2), Amount::new(181.31));
    /// assert_eq!(Amount::new(-0.125).round_to(2), Amount::new(-0.13));
    /// ```
    ///
    /// A scale too fine for `f64` to represent returns the value unchanged.
    pub fn round_to(&self, scale: u32) -> Amount {
        if scale > f64::MAX_10_EXP as u32 {
            return *self;
        }

        let factor = 10f64.powi(scale as i32);
        let scaled = self.0 * factor;
        if !scaled.is_finite() {
            return *self;
        }

        Amount(scaled.round() / factor)
    }

    /// Compares two amounts within an absolute tolerance.
    #[inline]
    pub fn approx_eq(&self, other: Amount, tolerance: f64) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimal places, for logs and debugging only.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<f64> for Amount {
    #[inline]
    fn from(value: f64) -> Self {
        Amount(value)
    }
}

impl From<Amount> for f64 {
    #[inline]
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Amount {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Amount(-self.0)
    }
}

/// Multiplication by a quantity or factor.
impl Mul<f64> for Amount {
    type Output = Self;

    #[inline]
    fn mul(self, factor: f64) -> Self {
        Amount(self.0 * factor)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, amount| acc + amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Domain Types
//!
//! Small value types shared by line items, bills and the engine config.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Rate       │   │     VatMode     │   │ EmptyBillPolicy │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  fraction (f64) │   │  Exclusive      │   │  Reject         │       │
//! │  │  0.07 = 7%      │   │  Inclusive      │   │  ZeroShare      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing rate is modelled as `Option<Rate>::None`, never as
//! `Rate::zero()`. The two are different inputs: a present 0% VAT rate still
//! takes the "rate present" branches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ConfigError;

// =============================================================================
// Rate
// =============================================================================

/// A fractional rate (VAT or withholding tax).
///
/// ## Representation
/// `0.07` means 7%. The engine does not range-check rates; see
/// [`validate_rate`](crate::validation::validate_rate) for the caller-side
/// check.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(f64);

impl Rate {
    /// Creates a rate from a fraction (0.07 = 7%).
    #[inline]
    pub const fn from_fraction(fraction: f64) -> Self {
        Rate(fraction)
    }

    /// Creates a rate from a percentage (7.0 = 7%).
    #[inline]
    pub fn from_percentage(pct: f64) -> Self {
        Rate(pct / 100.0)
    }

    /// Creates a rate from basis points (700 = 7%).
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        Rate(f64::from(bps) / 10_000.0)
    }

    /// Returns the rate as a fraction.
    #[inline]
    pub const fn fraction(&self) -> f64 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 * 100.0
    }

    /// The divisor used to back VAT out of an inclusive amount: `1 + rate`.
    #[inline]
    pub fn multiplier(&self) -> f64 {
        1.0 + self.0
    }

    /// Zero rate. Still a *present* rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0.0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Trim float noise such as 7.000000000000001%
        write!(f, "{}%", (self.percentage() * 1e6).round() / 1e6)
    }
}

// =============================================================================
// VAT Mode
// =============================================================================

/// How a line item's unit price and unit discount relate to VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum VatMode {
    /// Price + VAT shown separately.
    #[default]
    Exclusive,
    /// Price already contains VAT.
    Inclusive,
}

impl VatMode {
    /// Maps the `vat_included` request flag to a mode.
    #[inline]
    pub const fn from_included(vat_included: bool) -> Self {
        if vat_included {
            VatMode::Inclusive
        } else {
            VatMode::Exclusive
        }
    }

    #[inline]
    pub const fn is_inclusive(&self) -> bool {
        matches!(self, VatMode::Inclusive)
    }
}

// =============================================================================
// Empty Bill Policy
// =============================================================================

/// What to do when an invoice-level discount meets a bill with no items.
///
/// ## Policy Comparison
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  items = [], additional_discount_amount = 20                            │
/// │                                                                         │
/// │  REJECT (Default)                    │  ZERO_SHARE                      │
/// │  ─────────────────                   │  ───────────                     │
/// │  BillSummary::new → Err(             │  total_discount_per_item = 0     │
/// │    EmptyBillWithDiscount { 20 })     │  warn! event, every total = 0    │
/// │                                      │  (vat_adjustment still applies)  │
/// │                                                                         │
/// │  items = [] with a zero discount is accepted under both policies.      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EmptyBillPolicy {
    /// Refuse to build the bill.
    #[default]
    Reject,

    /// Treat the per-item share as zero.
    #[serde(alias = "zero", alias = "default_to_zero")]
    ZeroShare,
}

impl fmt::Display for EmptyBillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyBillPolicy::Reject => write!(f, "reject"),
            EmptyBillPolicy::ZeroShare => write!(f, "zero_share"),
        }
    }
}

impl FromStr for EmptyBillPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(EmptyBillPolicy::Reject),
            "zero_share" | "zero" | "default_to_zero" => Ok(EmptyBillPolicy::ZeroShare),
            other => Err(ConfigError::InvalidValue {
                key: "empty_bill_policy".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

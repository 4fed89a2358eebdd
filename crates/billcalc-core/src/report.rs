//! # Report Snapshots
//!
//! Serializable snapshots of a computed bill, shaped for JSON responses.
//!
//! ```json
//! {
//!   "total_amount_before_discount": 200.0,
//!   "total_discount_per_item": 10.0,
//!   "total_amount_before_vat": 181.31,
//!   "total_vat_amount": 12.69,
//!   "total_amount_after_vat": 194.0,
//!   "total_withholding_tax_amount": 0.0,
//!   "total_amount_due": 194.0,
//!   "vat_adjustment": 0.0,
//!   "items": [ { "description": "...", "amount_before_vat": 90.65, ... } ]
//! }
//! ```
//!
//! Snapshots are taken unrounded. `rounded(scale)` produces the presentation
//! copy; rounding each field independently means the rounded fields need not
//! add up exactly, which is what `vat_adjustment` exists to reconcile.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::amount::Amount;

// =============================================================================
// Line Item Totals
// =============================================================================

/// Every derived quantity of one line item, evaluated at one discount share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemTotals {
    pub description: String,
    pub base_price_per_unit: Amount,
    pub amount_before_discount: Amount,
    pub amount_discount: Amount,
    /// The invoice-level discount share, VAT-stripped.
    pub additional_discount: Amount,
    pub amount_before_vat: Amount,
    pub vat_amount: Amount,
    pub amount_after_vat: Amount,
    pub withholding_tax_amount: Amount,
    pub amount_due: Amount,
}

impl LineItemTotals {
    /// Returns a copy with every amount rounded to `scale` places.
    pub fn rounded(&self, scale: u32) -> Self {
        LineItemTotals {
            description: self.description.clone(),
            base_price_per_unit: self.base_price_per_unit.round_to(scale),
            amount_before_discount: self.amount_before_discount.round_to(scale),
            amount_discount: self.amount_discount.round_to(scale),
            additional_discount: self.additional_discount.round_to(scale),
            amount_before_vat: self.amount_before_vat.round_to(scale),
            vat_amount: self.vat_amount.round_to(scale),
            amount_after_vat: self.amount_after_vat.round_to(scale),
            withholding_tax_amount: self.withholding_tax_amount.round_to(scale),
            amount_due: self.amount_due.round_to(scale),
        }
    }
}

// =============================================================================
// Bill Totals
// =============================================================================

/// Aggregate totals of a bill plus the per-item breakdown in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillTotals {
    pub total_amount_before_discount: Amount,
    /// Flat share of the additional discount each item receives.
    pub total_discount_per_item: Amount,
    pub total_amount_before_vat: Amount,
    pub total_vat_amount: Amount,
    pub total_amount_after_vat: Amount,
    pub total_withholding_tax_amount: Amount,
    pub total_amount_due: Amount,
    pub vat_adjustment: Amount,
    pub items: Vec<LineItemTotals>,
}

impl BillTotals {
    /// Returns a copy with every amount (including items) rounded to `scale`.
    pub fn rounded(&self, scale: u32) -> Self {
        BillTotals {
            total_amount_before_discount: self.total_amount_before_discount.round_to(scale),
            total_discount_per_item: self.total_discount_per_item.round_to(scale),
            total_amount_before_vat: self.total_amount_before_vat.round_to(scale),
            total_vat_amount: self.total_vat_amount.round_to(scale),
            total_amount_after_vat: self.total_amount_after_vat.round_to(scale),
            total_withholding_tax_amount: self.total_withholding_tax_amount.round_to(scale),
            total_amount_due: self.total_amount_due.round_to(scale),
            vat_adjustment: self.vat_adjustment.round_to(scale),
            items: self.items.iter().map(|item| item.rounded(scale)).collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

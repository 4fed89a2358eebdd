//! # Line Item
//!
//! One billable line and every quantity derived from it.
//!
//! ## Derivation Chain
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Per-Item Derivation (order is the contract)            │
//! │                                                                         │
//! │  price_per_unit ──strip VAT──► base_price_per_unit                     │
//! │                                     │ × quantity                        │
//! │                                     ▼                                   │
//! │                             amount_before_discount                      │
//! │                                     │                                   │
//! │  discount_per_unit ──strip──► base_discount_per_unit × qty             │
//! │                                     │ = amount_discount                 │
//! │  additional_discount ──strip──► base_additional_discount               │
//! │                                     │                                   │
//! │                                     ▼  (subtract both)                  │
//! │                              amount_before_vat ───────────┐             │
//! │                                     │ × vat_rate          │ × wht_rate  │
//! │                                     ▼                     ▼             │
//! │                                vat_amount      withholding_tax_amount   │
//! │                                     │                     │             │
//! │  amount_after_vat = before + vat ───┴──► amount_due = after − wht      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Strip VAT" only happens when `vat_included` is set *and* a VAT rate is
//! present. Withholding tax is charged on the pre-VAT base.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::amount::Amount;
use crate::report::LineItemTotals;
use crate::types::{Rate, VatMode};
use crate::validation::{
    validate_description, validate_quantity, validate_rate, validate_unit_price,
    ValidationResult,
};

// =============================================================================
// Line Item
// =============================================================================

/// The raw commercial facts of one billable item.
///
/// Immutable once built: every derived quantity is a method computed on
/// demand. Methods that take `additional_discount` expect the raw
/// (VAT-convention) share handed down by a bill; standalone callers pass
/// [`Amount::zero()`].
///
/// ## Example
/// ```rust
/// use billcalc_core::{Amount, LineItem, Rate};
///
/// let item = LineItem::builder("Consulting")
///     .quantity(2.0)
///     .price_per_unit(107.0)
///     .vat_rate(Rate::from_fraction(0.07))
///     .vat_included(true)
///     .build();
///
/// let none = Amount::zero();
/// assert!(item.base_price_per_unit().approx_eq(Amount::new(100.0), 1e-9));
/// assert!(item.vat_amount(none).approx_eq(Amount::new(14.0), 1e-9));
/// assert!(item.amount_due(none).approx_eq(Amount::new(214.0), 1e-9));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    description: String,
    quantity: f64,
    price_per_unit: Amount,
    #[serde(default)]
    discount_per_unit: Amount,
    #[serde(default)]
    vat_rate: Option<Rate>,
    #[serde(default)]
    withholding_tax_rate: Option<Rate>,
    #[serde(default)]
    vat_included: bool,
}

impl LineItem {
    /// Creates a line item from already-validated fields.
    pub fn new(
        description: impl Into<String>,
        quantity: f64,
        price_per_unit: Amount,
        discount_per_unit: Amount,
        vat_rate: Option<Rate>,
        withholding_tax_rate: Option<Rate>,
        vat_included: bool,
    ) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            price_per_unit,
            discount_per_unit,
            vat_rate,
            withholding_tax_rate,
            vat_included,
        }
    }

    /// Starts a builder with quantity 1, zero price and no rates.
    pub fn builder(description: impl Into<String>) -> LineItemBuilder {
        LineItemBuilder::new(description)
    }

    // -------------------------------------------------------------------------
    // Stored fields
    // -------------------------------------------------------------------------

    /// Free-text label; not used in any calculation.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Units sold. Fractional quantities are allowed.
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Unit price as entered, VAT-inclusive when [`vat_included`](Self::vat_included) is set.
    pub fn price_per_unit(&self) -> Amount {
        self.price_per_unit
    }

    /// Unit discount as entered, on the same VAT basis as the price.
    pub fn discount_per_unit(&self) -> Amount {
        self.discount_per_unit
    }

    /// VAT rate; `None` means no VAT, which differs from a present zero rate.
    pub fn vat_rate(&self) -> Option<Rate> {
        self.vat_rate
    }

    /// Withholding tax rate, applied to the pre-VAT base.
    pub fn withholding_tax_rate(&self) -> Option<Rate> {
        self.withholding_tax_rate
    }

    /// Whether entered amounts already contain VAT.
    pub fn vat_included(&self) -> bool {
        self.vat_included
    }

    /// Typed view of [`vat_included`](Self::vat_included).
    pub fn vat_mode(&self) -> VatMode {
        VatMode::from_included(self.vat_included)
    }

    /// The rate to back out of inclusive amounts, if any.
    fn inclusive_rate(&self) -> Option<Rate> {
        if self.vat_included {
            self.vat_rate
        } else {
            None
        }
    }

    // -------------------------------------------------------------------------
    // Derived quantities
    // -------------------------------------------------------------------------

    /// Unit price with VAT removed (inclusive pricing) or as stated.
    pub fn base_price_per_unit(&self) -> Amount {
        self.price_per_unit.strip_vat(self.inclusive_rate())
    }

    /// `quantity × base_price_per_unit`.
    pub fn amount_before_discount(&self) -> Amount {
        self.base_price_per_unit() * self.quantity
    }

    /// Unit discount with VAT removed under the same rule as the price.
    pub fn base_discount_per_unit(&self) -> Amount {
        self.discount_per_unit.strip_vat(self.inclusive_rate())
    }

    /// `quantity × base_discount_per_unit`.
    pub fn amount_discount(&self) -> Amount {
        self.base_discount_per_unit() * self.quantity
    }

    /// Strips VAT from an arbitrary discount amount.
    pub fn base_additional_discount(&self, amount: Amount) -> Amount {
        amount.strip_vat(self.inclusive_rate())
    }

    /// Taxable base after the unit discount and the additional discount.
    pub fn amount_before_vat(&self, additional_discount: Amount) -> Amount {
        self.amount_before_discount()
            - (self.amount_discount() + self.base_additional_discount(additional_discount))
    }

    /// VAT charged on the taxable base; exactly zero without a VAT rate.
    pub fn vat_amount(&self, additional_discount: Amount) -> Amount {
        self.amount_before_vat(additional_discount)
            .apply_rate(self.vat_rate)
    }

    pub fn amount_after_vat(&self, additional_discount: Amount) -> Amount {
        self.amount_before_vat(additional_discount) + self.vat_amount(additional_discount)
    }

    /// Withholding on the pre-VAT base; exactly zero without a rate.
    pub fn withholding_tax_amount(&self, additional_discount: Amount) -> Amount {
        self.amount_before_vat(additional_discount)
            .apply_rate(self.withholding_tax_rate)
    }

    pub fn amount_due(&self, additional_discount: Amount) -> Amount {
        self.amount_after_vat(additional_discount)
            - self.withholding_tax_amount(additional_discount)
    }

    /// Snapshot of every derived quantity for the given discount share.
    pub fn totals(&self, additional_discount: Amount) -> LineItemTotals {
        LineItemTotals {
            description: self.description.clone(),
            base_price_per_unit: self.base_price_per_unit(),
            amount_before_discount: self.amount_before_discount(),
            amount_discount: self.amount_discount(),
            additional_discount: self.base_additional_discount(additional_discount),
            amount_before_vat: self.amount_before_vat(additional_discount),
            vat_amount: self.vat_amount(additional_discount),
            amount_after_vat: self.amount_after_vat(additional_discount),
            withholding_tax_amount: self.withholding_tax_amount(additional_discount),
            amount_due: self.amount_due(additional_discount),
        }
    }

    /// Runs the caller-side input checks over this item's fields.
    ///
    /// Not called by any calculation; callers building items from untrusted
    /// input run it (or [`BillSummary::validated`](crate::BillSummary::validated))
    /// before trusting the totals.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_description(&self.description)?;
        validate_quantity(self.quantity)?;
        validate_unit_price("price_per_unit", self.price_per_unit.value())?;
        validate_unit_price("discount_per_unit", self.discount_per_unit.value())?;
        if let Some(rate) = self.vat_rate {
            validate_rate("vat_rate", rate)?;
        }
        if let Some(rate) = self.withholding_tax_rate {
            validate_rate("withholding_tax_rate", rate)?;
        }
        Ok(())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`LineItem`].
#[derive(Debug, Clone)]
pub struct LineItemBuilder {
    item: LineItem,
}

impl LineItemBuilder {
    fn new(description: impl Into<String>) -> Self {
        LineItemBuilder {
            item: LineItem::new(
                description,
                1.0,
                Amount::zero(),
                Amount::zero(),
                None,
                None,
                false,
            ),
        }
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.item.quantity = quantity;
        self
    }

    pub fn price_per_unit(mut self, price: impl Into<Amount>) -> Self {
        self.item.price_per_unit = price.into();
        self
    }

    pub fn discount_per_unit(mut self, discount: impl Into<Amount>) -> Self {
        self.item.discount_per_unit = discount.into();
        self
    }

    pub fn vat_rate(mut self, rate: Rate) -> Self {
        self.item.vat_rate = Some(rate);
        self
    }

    pub fn withholding_tax_rate(mut self, rate: Rate) -> Self {
        self.item.withholding_tax_rate = Some(rate);
        self
    }

    pub fn vat_included(mut self, vat_included: bool) -> Self {
        self.item.vat_included = vat_included;
        self
    }

    pub fn build(self) -> LineItem {
        self.item
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

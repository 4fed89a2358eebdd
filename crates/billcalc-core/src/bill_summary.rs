//! # Bill Summary
//!
//! Aggregates line items plus invoice-level adjustments into bill totals.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bill Totals                                      │
//! │                                                                         │
//! │  additional_discount_amount ──÷ item count──► total_discount_per_item  │
//! │                                  (flat, same for every item)           │
//! │                                         │                               │
//! │  for each item: item.f(total_discount_per_item)                        │
//! │                                         │                               │
//! │            Σ amount_before_discount ────┼──► total_amount_before_discount
//! │            Σ amount_before_vat − adj ───┼──► total_amount_before_vat   │
//! │            Σ vat_amount + adj ──────────┼──► total_vat_amount          │
//! │            Σ amount_after_vat ──────────┼──► total_amount_after_vat    │
//! │            Σ withholding_tax_amount ────┴──► total_withholding_tax_amount
//! │                                                                         │
//! │  total_amount_due = total_amount_after_vat − total_withholding         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `vat_adjustment` moves value between the pre-VAT subtotal and the VAT
//! total. It does not touch `total_amount_after_vat`, which is summed per
//! item rather than derived from the two adjusted totals.

use tracing::{debug, warn};

use crate::amount::Amount;
use crate::config::EngineConfig;
use crate::error::{CoreError, CoreResult};
use crate::line_item::LineItem;
use crate::report::{BillTotals, LineItemTotals};
use crate::types::EmptyBillPolicy;
use crate::validation::validate_amount;

// =============================================================================
// Bill Summary
// =============================================================================

fn check_item_limit(count: usize, config: &EngineConfig) -> CoreResult<()> {
    if count > config.max_items {
        return Err(CoreError::TooManyItems {
            count,
            max: config.max_items,
        });
    }
    Ok(())
}

/// An immutable bill: ordered items, an invoice-level discount and a manual
/// VAT adjustment.
///
/// ## Example
/// ```rust
/// use billcalc_core::{Amount, BillSummary, LineItem, Rate};
///
/// let item = LineItem::builder("Widget")
///     .quantity(1.0)
///     .price_per_unit(107.0)
///     .vat_rate(Rate::from_fraction(0.07))
///     .vat_included(true)
///     .build();
///
/// let bill = BillSummary::new(
///     vec![item.clone(), item],
///     Amount::new(20.0),
///     Amount::zero(),
/// )
/// .unwrap();
///
/// assert_eq!(bill.total_discount_per_item(), Amount::new(10.0));
/// assert!(bill
///     .total_amount_before_vat()
///     .approx_eq(Amount::new(181.308411), 1e-6));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BillSummary {
    items: Vec<LineItem>,
    additional_discount_amount: Amount,
    vat_adjustment: Amount,
    total_discount_per_item: Amount,
}

impl BillSummary {
    /// Builds a bill under the default [`EmptyBillPolicy::Reject`].
    pub fn new(
        items: Vec<LineItem>,
        additional_discount_amount: Amount,
        vat_adjustment: Amount,
    ) -> CoreResult<Self> {
        Self::with_policy(
            items,
            additional_discount_amount,
            vat_adjustment,
            EmptyBillPolicy::default(),
        )
    }

    /// Builds a bill, resolving the empty-items case with `policy`.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyBillWithDiscount`] when `items` is empty, the
    ///   additional discount is nonzero and `policy` is `Reject`
    pub fn with_policy(
        items: Vec<LineItem>,
        additional_discount_amount: Amount,
        vat_adjustment: Amount,
        policy: EmptyBillPolicy,
    ) -> CoreResult<Self> {
        let total_discount_per_item = if items.is_empty() {
            if !additional_discount_amount.is_zero() {
                match policy {
                    EmptyBillPolicy::Reject => {
                        return Err(CoreError::EmptyBillWithDiscount {
                            amount: additional_discount_amount.value(),
                        });
                    }
                    EmptyBillPolicy::ZeroShare => {
                        warn!(
                            additional_discount = %additional_discount_amount,
                            "Bill has no items; additional discount is not applied"
                        );
                    }
                }
            }
            Amount::zero()
        } else {
            Amount::new(additional_discount_amount.value() / items.len() as f64)
        };

        debug!(
            items = items.len(),
            additional_discount = %additional_discount_amount,
            share = %total_discount_per_item,
            vat_adjustment = %vat_adjustment,
            "Bill summary built"
        );

        Ok(BillSummary {
            items,
            additional_discount_amount,
            vat_adjustment,
            total_discount_per_item,
        })
    }

    /// Builds a bill with the configured policy and item limit.
    ///
    /// ## Errors
    /// - [`CoreError::TooManyItems`] when `items` exceeds `config.max_items`
    /// - anything [`BillSummary::with_policy`] returns
    pub fn with_config(
        items: Vec<LineItem>,
        additional_discount_amount: Amount,
        vat_adjustment: Amount,
        config: &EngineConfig,
    ) -> CoreResult<Self> {
        check_item_limit(items.len(), config)?;

        Self::with_policy(
            items,
            additional_discount_amount,
            vat_adjustment,
            config.empty_bill_policy,
        )
    }

    /// Validates every input, then builds with [`BillSummary::with_config`].
    ///
    /// Item failures name the item, e.g. `items[2].vat_rate`. An oversized
    /// bill fails with [`CoreError::TooManyItems`], as in `with_config`.
    pub fn validated(
        items: Vec<LineItem>,
        additional_discount_amount: Amount,
        vat_adjustment: Amount,
        config: &EngineConfig,
    ) -> CoreResult<Self> {
        check_item_limit(items.len(), config)?;
        validate_amount(
            "additional_discount_amount",
            additional_discount_amount.value(),
        )?;
        validate_amount("vat_adjustment", vat_adjustment.value())?;

        for (index, item) in items.iter().enumerate() {
            item.validate()
                .map_err(|e| e.within(&format!("items[{}]", index)))?;
        }

        Self::with_config(items, additional_discount_amount, vat_adjustment, config)
    }

    // -------------------------------------------------------------------------
    // Stored state
    // -------------------------------------------------------------------------

    /// Items in construction (display) order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of items on the bill.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the bill has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Invoice-level discount as entered, before it is split.
    pub fn additional_discount_amount(&self) -> Amount {
        self.additional_discount_amount
    }

    /// Manual correction moved from the pre-VAT total to the VAT total.
    pub fn vat_adjustment(&self) -> Amount {
        self.vat_adjustment
    }

    /// The flat per-item share of the additional discount, fixed at
    /// construction. Not weighted by item value.
    pub fn total_discount_per_item(&self) -> Amount {
        self.total_discount_per_item
    }

    // -------------------------------------------------------------------------
    // Aggregate totals
    // -------------------------------------------------------------------------

    fn sum_items<F>(&self, per_item: F) -> Amount
    where
        F: Fn(&LineItem, Amount) -> Amount,
    {
        self.items
            .iter()
            .map(|item| per_item(item, self.total_discount_per_item))
            .sum()
    }

    /// Σ `amount_before_discount`; the additional discount plays no part.
    pub fn total_amount_before_discount(&self) -> Amount {
        self.sum_items(|item, _| item.amount_before_discount())
    }

    /// Σ `amount_before_vat` at the flat share, minus `vat_adjustment`.
    pub fn total_amount_before_vat(&self) -> Amount {
        self.sum_items(LineItem::amount_before_vat) - self.vat_adjustment
    }

    /// Σ `amount_after_vat` at the flat share. Unaffected by `vat_adjustment`.
    pub fn total_amount_after_vat(&self) -> Amount {
        self.sum_items(LineItem::amount_after_vat)
    }

    /// Σ `vat_amount` at the flat share, plus `vat_adjustment`.
    pub fn total_vat_amount(&self) -> Amount {
        self.sum_items(LineItem::vat_amount) + self.vat_adjustment
    }

    /// Σ `withholding_tax_amount` at the flat share.
    pub fn total_withholding_tax_amount(&self) -> Amount {
        self.sum_items(LineItem::withholding_tax_amount)
    }

    /// After-VAT total less withholding.
    pub fn total_amount_due(&self) -> Amount {
        self.total_amount_after_vat() - self.total_withholding_tax_amount()
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Per-item breakdown at the bill's discount share, in display order.
    pub fn item_totals(&self) -> Vec<LineItemTotals> {
        self.items
            .iter()
            .map(|item| item.totals(self.total_discount_per_item))
            .collect()
    }

    /// Unrounded snapshot of every total.
    pub fn totals(&self) -> BillTotals {
        BillTotals {
            total_amount_before_discount: self.total_amount_before_discount(),
            total_discount_per_item: self.total_discount_per_item,
            total_amount_before_vat: self.total_amount_before_vat(),
            total_vat_amount: self.total_vat_amount(),
            total_amount_after_vat: self.total_amount_after_vat(),
            total_withholding_tax_amount: self.total_withholding_tax_amount(),
            total_amount_due: self.total_amount_due(),
            vat_adjustment: self.vat_adjustment,
            items: self.item_totals(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::Rate;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn amount(v: f64) -> Amount {
        Amount::new(v)
    }

    fn inclusive_item(quantity: f64) -> LineItem {
        LineItem::builder("Widget")
            .quantity(quantity)
            .price_per_unit(107.0)
            .vat_rate(Rate::from_fraction(0.07))
            .vat_included(true)
            .build()
    }

    fn mixed_items() -> Vec<LineItem> {
        vec![
            inclusive_item(2.0),
            LineItem::builder("Support")
                .quantity(3.0)
                .price_per_unit(50.0)
                .discount_per_unit(5.0)
                .vat_rate(Rate::from_fraction(0.07))
                .withholding_tax_rate(Rate::from_fraction(0.03))
                .build(),
            LineItem::builder("Exempt fee").quantity(1.0).price_per_unit(30.0).build(),
        ]
    }

    #[test]
    fn test_two_item_invoice_discount() {
        let bill = BillSummary::new(
            vec![inclusive_item(1.0), inclusive_item(1.0)],
            amount(20.0),
            Amount::zero(),
        )
        .unwrap();

        assert_eq!(bill.total_discount_per_item(), amount(10.0));
        assert!(bill.total_amount_before_discount().approx_eq(amount(200.0), EPS));

        let expected = 2.0 * (100.0 - 10.0 / 1.07);
        assert!(bill.total_amount_before_vat().approx_eq(amount(expected), EPS));
        assert!(bill
            .total_amount_before_vat()
            .approx_eq(amount(181.308), 1e-3));
    }

    #[test]
    fn test_share_is_flat_not_proportional() {
        let cheap = LineItem::builder("Cheap").price_per_unit(10.0).build();
        let pricey = LineItem::builder("Pricey").price_per_unit(990.0).build();
        let bill = BillSummary::new(vec![cheap, pricey], amount(100.0), Amount::zero()).unwrap();

        let items = bill.item_totals();
        assert_eq!(items[0].additional_discount, amount(50.0));
        assert_eq!(items[1].additional_discount, amount(50.0));
        assert_eq!(items[0].amount_before_vat, amount(-40.0));
        assert_eq!(items[1].amount_before_vat, amount(940.0));
    }

    #[test]
    fn test_vat_adjustment_moves_value_between_totals() {
        let items = mixed_items();
        let plain = BillSummary::new(items.clone(), amount(6.0), Amount::zero()).unwrap();
        let adjusted = BillSummary::new(items, amount(6.0), amount(0.02)).unwrap();

        assert!(adjusted
            .total_amount_before_vat()
            .approx_eq(plain.total_amount_before_vat() - amount(0.02), EPS));
        assert!(adjusted
            .total_vat_amount()
            .approx_eq(plain.total_vat_amount() + amount(0.02), EPS));
        assert_eq!(adjusted.total_amount_after_vat(), plain.total_amount_after_vat());
        assert_eq!(adjusted.total_amount_due(), plain.total_amount_due());
    }

    #[test]
    fn test_withholding_and_due() {
        let bill = BillSummary::new(mixed_items(), Amount::zero(), Amount::zero()).unwrap();

        // Support: 3 × (50 − 5) = 135 → wht 4.05
        assert!(bill.total_withholding_tax_amount().approx_eq(amount(4.05), EPS));
        // 214 + 144.45 + 30
        assert!(bill.total_amount_after_vat().approx_eq(amount(388.45), EPS));
        assert!(bill.total_amount_due().approx_eq(amount(384.4), EPS));
    }

    #[test]
    fn test_aggregates_equal_per_item_sums() {
        let bill = BillSummary::new(mixed_items(), amount(9.0), amount(-0.01)).unwrap();
        let share = bill.total_discount_per_item();
        assert_eq!(share, amount(3.0));

        let wht: Amount = bill
            .items()
            .iter()
            .map(|i| i.withholding_tax_amount(share))
            .sum();
        let vat: Amount = bill.items().iter().map(|i| i.vat_amount(share)).sum();
        let after: Amount = bill.items().iter().map(|i| i.amount_after_vat(share)).sum();
        let before_vat: Amount = bill.items().iter().map(|i| i.amount_before_vat(share)).sum();

        assert_eq!(bill.total_withholding_tax_amount(), wht);
        assert_eq!(bill.total_amount_after_vat(), after);
        assert_eq!(bill.total_vat_amount(), vat + amount(-0.01));
        assert_eq!(bill.total_amount_before_vat(), before_vat - amount(-0.01));
    }

    #[test]
    fn test_item_order_is_preserved() {
        let bill = BillSummary::new(mixed_items(), Amount::zero(), Amount::zero()).unwrap();
        let names: Vec<&str> = bill.items().iter().map(|i| i.description()).collect();
        assert_eq!(names, ["Widget", "Support", "Exempt fee"]);

        let snapshot: Vec<String> = bill.totals().items.into_iter().map(|i| i.description).collect();
        assert_eq!(snapshot, ["Widget", "Support", "Exempt fee"]);
    }

    #[test]
    fn test_empty_bill_with_discount_is_rejected_by_default() {
        let err = BillSummary::new(Vec::new(), amount(20.0), Amount::zero()).unwrap_err();
        match err {
            CoreError::EmptyBillWithDiscount { amount } => assert_eq!(amount, 20.0),
            other => panic!("expected EmptyBillWithDiscount, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_bill_with_zero_share_policy() {
        let bill = BillSummary::with_policy(
            Vec::new(),
            amount(20.0),
            amount(0.5),
            EmptyBillPolicy::ZeroShare,
        )
        .unwrap();

        assert!(bill.is_empty());
        assert_eq!(bill.total_discount_per_item(), Amount::zero());
        assert!(bill.total_discount_per_item().is_finite());
        assert_eq!(bill.total_amount_before_discount(), Amount::zero());
        assert_eq!(bill.total_amount_after_vat(), Amount::zero());
        assert_eq!(bill.total_amount_due(), Amount::zero());
        assert_eq!(bill.total_amount_before_vat(), amount(-0.5));
        assert_eq!(bill.total_vat_amount(), amount(0.5));
    }

    #[test]
    fn test_empty_bill_without_discount_is_fine_under_reject() {
        let bill = BillSummary::new(Vec::new(), Amount::zero(), Amount::zero()).unwrap();
        assert_eq!(bill.total_discount_per_item(), Amount::zero());
        assert_eq!(bill.totals().total_amount_due, Amount::zero());
        assert_eq!(bill, BillSummary::default());
    }

    #[test]
    fn test_with_config_enforces_max_items() {
        let config = EngineConfig {
            max_items: 2,
            ..EngineConfig::default()
        };
        let err = BillSummary::with_config(mixed_items(), Amount::zero(), Amount::zero(), &config)
            .unwrap_err();
        assert!(matches!(err, CoreError::TooManyItems { count: 3, max: 2 }));
    }

    #[test]
    fn test_with_config_uses_configured_policy() {
        let config = EngineConfig {
            empty_bill_policy: EmptyBillPolicy::ZeroShare,
            ..EngineConfig::default()
        };
        let bill =
            BillSummary::with_config(Vec::new(), amount(5.0), Amount::zero(), &config).unwrap();
        assert_eq!(bill.additional_discount_amount(), amount(5.0));
        assert_eq!(bill.total_discount_per_item(), Amount::zero());
    }

    #[test]
    fn test_validated_names_offending_item() {
        let mut items = mixed_items();
        items.push(
            LineItem::builder("Broken")
                .price_per_unit(10.0)
                .vat_rate(Rate::from_fraction(-1.0))
                .build(),
        );

        let err = BillSummary::validated(items, Amount::zero(), Amount::zero(), &EngineConfig::default())
            .unwrap_err();
        match err {
            CoreError::Validation(e) => assert_eq!(e.field(), "items[3].vat_rate"),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_item_limit_error_is_the_same_on_both_paths() {
        let config = EngineConfig {
            max_items: 2,
            ..EngineConfig::default()
        };

        let built = BillSummary::with_config(mixed_items(), Amount::zero(), Amount::zero(), &config)
            .unwrap_err();
        let validated =
            BillSummary::validated(mixed_items(), Amount::zero(), Amount::zero(), &config)
                .unwrap_err();

        assert!(matches!(built, CoreError::TooManyItems { count: 3, max: 2 }));
        assert!(matches!(validated, CoreError::TooManyItems { count: 3, max: 2 }));
    }

    #[test]
    fn test_rounding_far_past_f64_precision_keeps_totals() {
        let totals = BillSummary::default().totals().rounded(400);
        assert_eq!(totals.total_amount_due, Amount::zero());

        let bill = BillSummary::new(mixed_items(), Amount::zero(), Amount::zero()).unwrap();
        let rounded = bill.totals().rounded(400);
        assert_eq!(rounded.total_amount_after_vat, bill.total_amount_after_vat());
        assert!(rounded.items.iter().all(|i| i.amount_due.is_finite()));
    }

    #[test]
    fn test_validated_rejects_non_finite_adjustments() {
        let err = BillSummary::validated(
            mixed_items(),
            amount(f64::NAN),
            Amount::zero(),
            &EngineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBeFinite { .. })
        ));
    }

    #[test]
    fn test_validated_accepts_good_input() {
        let bill = BillSummary::validated(
            mixed_items(),
            amount(3.0),
            amount(0.01),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(bill.len(), 3);
    }

    #[test]
    fn test_totals_snapshot_and_rounding() {
        let bill = BillSummary::new(
            vec![inclusive_item(1.0), inclusive_item(1.0)],
            amount(20.0),
            Amount::zero(),
        )
        .unwrap();
        let totals = bill.totals();

        assert_eq!(totals.total_amount_before_vat, bill.total_amount_before_vat());
        assert_eq!(totals.total_discount_per_item, amount(10.0));
        assert_eq!(totals.items.len(), 2);

        let rounded = totals.rounded(2);
        assert_eq!(rounded.total_amount_before_vat, amount(181.31));
        assert_eq!(rounded.items[0].additional_discount, amount(9.35));
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    fn any_items() -> impl Strategy<Value = Vec<LineItem>> {
        proptest::collection::vec(
            (
                0.0f64..100.0,
                0.0f64..5_000.0,
                0.0f64..100.0,
                proptest::option::of(0.0f64..0.3),
                proptest::option::of(0.0f64..0.1),
                any::<bool>(),
            )
                .prop_map(|(qty, price, discount, vat, wht, included)| {
                    LineItem::new(
                        "prop",
                        qty,
                        Amount::new(price),
                        Amount::new(discount),
                        vat.map(Rate::from_fraction),
                        wht.map(Rate::from_fraction),
                        included,
                    )
                }),
            1..12,
        )
    }

    proptest! {
        #[test]
        fn prop_totals_are_sums_at_flat_share(
            items in any_items(),
            discount in 0.0f64..500.0,
            adjustment in -1.0f64..1.0,
        ) {
            let bill = BillSummary::new(items, Amount::new(discount), Amount::new(adjustment)).unwrap();
            let share = Amount::new(discount / bill.len() as f64);
            prop_assert_eq!(bill.total_discount_per_item(), share);

            let wht: Amount = bill.items().iter().map(|i| i.withholding_tax_amount(share)).sum();
            let after: Amount = bill.items().iter().map(|i| i.amount_after_vat(share)).sum();
            prop_assert_eq!(bill.total_withholding_tax_amount(), wht);
            prop_assert_eq!(bill.total_amount_after_vat(), after);
            prop_assert_eq!(bill.total_amount_due(), after - wht);
        }

        #[test]
        fn prop_item_order_does_not_change_totals(items in any_items(), discount in 0.0f64..500.0) {
            let mut reversed = items.clone();
            reversed.reverse();
            let a = BillSummary::new(items, Amount::new(discount), Amount::zero()).unwrap();
            let b = BillSummary::new(reversed, Amount::new(discount), Amount::zero()).unwrap();

            let tolerance = 1e-6 * a.total_amount_before_discount().value().abs().max(1.0);
            prop_assert!(a.total_amount_due().approx_eq(b.total_amount_due(), tolerance));
            prop_assert!(a.total_vat_amount().approx_eq(b.total_vat_amount(), tolerance));
        }
    }
}

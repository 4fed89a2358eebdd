//! # billcalc-core: Bill Calculation Engine
//!
//! Computes line-item and bill totals for invoices: VAT-inclusive and
//! VAT-exclusive pricing, per-unit discounts, an invoice-level discount split
//! across items, withholding tax and a manual VAT rounding adjustment.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bill Calculation                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Host application (HTTP handler, CLI, UI)             │   │
//! │  │    decodes requests ──► LineItem values ──► renders BillTotals  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billcalc-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  amount   │  │ line_item │  │   bill_   │  │  report   │  │   │
//! │  │   │  Amount   │  │ LineItem  │  │  summary  │  │ BillTotals│  │   │
//! │  │   │ strip_vat │  │ 10 steps  │  │ aggregate │  │  rounded  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • DETERMINISTIC ARITHMETIC          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`amount`] - Amount type and the VAT primitives
//! - [`types`] - Rate, VAT mode, empty-bill policy
//! - [`line_item`] - Per-item derivation chain
//! - [`bill_summary`] - Bill-level aggregation
//! - [`report`] - Serializable snapshots
//! - [`validation`] - Optional input checks
//! - [`config`] - Engine configuration (TOML + environment)
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use billcalc_core::{Amount, BillSummary, LineItem, Rate};
//!
//! // 107.00 including 7% VAT
//! let widget = LineItem::builder("Widget")
//!     .quantity(2.0)
//!     .price_per_unit(107.0)
//!     .vat_rate(Rate::from_fraction(0.07))
//!     .vat_included(true)
//!     .build();
//!
//! assert!(widget
//!     .amount_before_vat(Amount::zero())
//!     .approx_eq(Amount::new(200.0), 1e-9));
//! assert!(widget
//!     .amount_after_vat(Amount::zero())
//!     .approx_eq(Amount::new(214.0), 1e-9));
//!
//! let bill = BillSummary::new(vec![widget], Amount::new(10.7), Amount::zero()).unwrap();
//! let totals = bill.totals().rounded(2);
//!
//! assert_eq!(totals.total_amount_before_vat, Amount::new(190.0));
//! assert_eq!(totals.total_amount_due, Amount::new(203.3));
//! ```
//!
//! Amounts are `f64` and nothing is rounded during computation. Call
//! [`BillTotals::rounded`] when presenting.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod amount;
pub mod bill_summary;
pub mod config;
pub mod error;
pub mod line_item;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use amount::Amount;
pub use bill_summary::BillSummary;
pub use config::EngineConfig;
pub use error::{ConfigError, CoreError, CoreResult, ValidationError};
pub use line_item::{LineItem, LineItemBuilder};
pub use report::{BillTotals, LineItemTotals};
pub use types::{EmptyBillPolicy, Rate, VatMode};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default maximum number of items on one bill.
///
/// Overridable through [`EngineConfig::max_items`].
pub const MAX_BILL_ITEMS: usize = 1000;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

// =============================================================================
// Unit Tests
// =============================================================================

//! Purchase records and total arithmetic.
//!
//! A purchase is a customer name plus an ordered sequence of line items.
//! The service computes and stores per-line totals, but some call sites
//! derive totals client-side before submission, so the arithmetic here must
//! be able to recompute them. Both the on-screen totals and the receipt
//! export go through these functions and nothing else, which is what keeps
//! the two displays consistent.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, PurchaseId, PurchaseItemId};

/// Number of decimal places used for currency amounts.
const CURRENCY_DP: u32 = 2;

/// One product/quantity entry within a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLineItem {
    /// Server-assigned identifier.
    pub id: PurchaseItemId,
    /// Product name captured at purchase time.
    pub product_name: String,
    /// Unit price captured at purchase time.
    #[serde(rename = "product_price")]
    pub unit_price: Decimal,
    /// Units purchased.
    pub quantity: u32,
    /// Server-recorded line total, when present.
    #[serde(rename = "total_price", default)]
    pub line_total: Option<Decimal>,
}

impl PurchaseLineItem {
    /// The line total: the recorded value when present, else recomputed
    /// from unit price and quantity.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.line_total
            .unwrap_or_else(|| line_total(self.unit_price, self.quantity))
    }
}

/// A recorded purchase with its nested line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Server-assigned identifier (doubles as the receipt number).
    pub id: PurchaseId,
    /// Customer the purchase was recorded for.
    pub customer_name: String,
    /// When the purchase was recorded.
    pub purchase_date: DateTime<Utc>,
    /// Line items, in submission order.
    pub items: Vec<PurchaseLineItem>,
}

impl Purchase {
    /// Sum of all line-item totals.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        grand_total(&self.items)
    }
}

/// One line of a purchase submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchaseItem {
    /// Product being purchased.
    pub product: ProductId,
    /// Units purchased; the capture forms floor this at 1.
    pub quantity: u32,
}

/// A purchase submission body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchase {
    /// Customer the purchase is recorded for.
    pub customer_name: String,
    /// Line items; must be non-empty for a valid submission.
    pub items: Vec<NewPurchaseItem>,
}

/// Compute a line total from unit price and quantity.
///
/// Rounds to 2 decimal places, half-up, for currency display. A quantity of
/// zero is clamped to 1, mirroring the floor applied when capturing input.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    let quantity = quantity.max(1);
    (unit_price * Decimal::from(quantity))
        .round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum line-item totals into a grand total.
///
/// Order-independent; an empty sequence yields zero.
#[must_use]
pub fn grand_total<'a>(items: impl IntoIterator<Item = &'a PurchaseLineItem>) -> Decimal {
    items.into_iter().map(PurchaseLineItem::total).sum()
}

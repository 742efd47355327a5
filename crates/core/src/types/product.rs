//! Product records as exchanged with the inventory service.
//!
//! Products are server-owned; the client only ever holds read-only or
//! edit-in-flight copies. Prices cross the wire as decimal strings and are
//! parsed into [`Decimal`] at the boundary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A product as returned by the inventory service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Units currently in stock.
    pub quantity: u32,
    /// Expiry date, if the product has one.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Category label used for dashboard grouping.
    #[serde(default)]
    pub category: String,
}

/// Product fields for create and update requests (everything but the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Units in stock.
    pub quantity: u32,
    /// Expiry date, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    /// Category label.
    #[serde(default)]
    pub category: String,
}

//! Core types for the SmartStock client.
//!
//! This module provides the record shapes exchanged with the inventory
//! service and the pure arithmetic over them.

pub mod credential;
pub mod id;
pub mod product;
pub mod purchase;

pub use credential::Credential;
pub use id::*;
pub use product::{NewProduct, Product};
pub use purchase::{
    NewPurchase, NewPurchaseItem, Purchase, PurchaseLineItem, grand_total, line_total,
};

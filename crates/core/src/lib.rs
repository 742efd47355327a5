//! SmartStock Core - Shared types library.
//!
//! This crate provides common types used across all SmartStock client
//! components:
//! - `client` - Session handling, API gateway, summaries, receipt export
//! - `cli` - The `smartstock` command-line frontend
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no filesystem access. This keeps it lightweight and allows it to
//! be used anywhere, including inside tests that never touch the network.
//!
//! # Modules
//!
//! - [`types`] - Credential pair, newtype IDs, product and purchase records,
//!   and the purchase total arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

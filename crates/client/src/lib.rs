//! SmartStock client library.
//!
//! Everything the `smartstock` binary needs to talk to the inventory
//! service:
//!
//! - [`config`] - Environment-driven configuration (base URL, session file)
//! - [`session`] - Durable credential store and the authorization gate
//! - [`api`] - The authorized request gateway and all REST operations
//! - [`summary`] - Dashboard summaries and client-side search filters
//! - [`receipt`] - PDF receipt export
//! - [`error`] - The unified error type
//!
//! # Architecture
//!
//! The session store is the only client-side persistent state, and it is
//! injected into the gateway and the guard rather than read from ambient
//! global storage - both stay testable without any environment setup. Every
//! request, authenticated or not, flows through the gateway; there is no
//! second HTTP path.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod receipt;
pub mod session;
pub mod summary;

pub use api::{ApiClient, ApiError};
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use receipt::{Receipt, ReceiptError};
pub use session::{Access, SessionError, SessionGuard, SessionStore, display_name};
pub use summary::InventorySummary;

//! Unified error handling for the client.
//!
//! Each module defines its own error type; `ClientError` aggregates them so
//! the binary can catch at the command layer, report, and exit without ever
//! letting a failure propagate as a panic.

use thiserror::Error;

use smartstock_core::PurchaseId;

use crate::api::ApiError;
use crate::receipt::ReceiptError;
use crate::session::SessionError;

/// Application-level error type for the SmartStock client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An API request failed (transport, rejection, or decoding).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session store failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Receipt rendering or saving failed.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// A protected operation was attempted without an active session.
    #[error("no active session; log in first")]
    LoginRequired,

    /// A purchase submission with zero line items was rejected before any
    /// request was issued.
    #[error("a purchase needs at least one line item")]
    EmptySubmission,

    /// A purchase fetched for display or export had no line items.
    #[error("purchase {0} has no line items")]
    EmptyPurchase(PurchaseId),
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        assert_eq!(
            ClientError::LoginRequired.to_string(),
            "no active session; log in first"
        );
        assert_eq!(
            ClientError::EmptyPurchase(PurchaseId::new(7)).to_string(),
            "purchase 7 has no line items"
        );
        assert_eq!(
            ClientError::EmptySubmission.to_string(),
            "a purchase needs at least one line item"
        );
    }
}

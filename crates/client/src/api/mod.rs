//! SmartStock REST API client.
//!
//! # Architecture
//!
//! - The service is the source of truth - no local sync, direct API calls
//! - A single request path: every operation, authenticated or not, goes
//!   through [`ApiClient::send`], which attaches the bearer header exactly
//!   when the injected session store holds a credential
//! - The gateway never mutates the session store; [`ApiClient::login`]
//!   returns the issued credential for the caller to persist
//! - A 401/403 is not retried and does not clear the session - call sites
//!   decide whether to redirect to login
//!
//! # Example
//!
//! ```rust,ignore
//! use smartstock_client::{ApiClient, ClientConfig, SessionStore};
//!
//! let config = ClientConfig::from_env()?;
//! let store = SessionStore::new(&config.session_file);
//! let client = ApiClient::new(&config, store.clone())?;
//!
//! // Log in and persist the session
//! let credential = client.login("admin", "hunter2").await?;
//! store.set(&credential)?;
//!
//! // Subsequent calls carry the bearer token automatically
//! let products = client.list_products().await?;
//! ```

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use smartstock_core::{
    Credential, NewProduct, NewPurchase, Product, ProductId, Purchase, PurchaseId,
};

use crate::config::ClientConfig;
use crate::session::SessionStore;

/// How much of an unstructured error body to keep in the error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Errors that can occur when talking to the inventory service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection,
    /// timeout). There is no retry policy; the failure is surfaced as-is.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status. Carries the status and
    /// the server-provided error payload for the caller to interpret.
    #[error("{status}: {message}")]
    Status {
        /// HTTP status of the rejection.
        status: StatusCode,
        /// Server-provided error detail, or the raw body when unstructured.
        message: String,
    },

    /// A 2xx body failed to decode into the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A path suffix could not be joined onto the base URL.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether this is a rejected-authorization failure (HTTP 401/403) -
    /// a missing, stale, or invalid token on a protected endpoint.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.status(),
            Some(status) if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
        )
    }

    /// The HTTP status of a rejection, when there is one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Token pair as issued by the token endpoint. Converted to a
/// [`Credential`] immediately; never logged.
#[derive(serde::Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the SmartStock inventory service.
///
/// Wraps every outbound call, centralizing the base URL, the JSON content
/// type, and bearer-token attachment from the injected [`SessionStore`].
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    /// Create a new API client from configuration and an injected store.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                session,
            }),
        })
    }

    /// Issue a request to `base_url + path`.
    ///
    /// Reads the session store on every call - no caching - and attaches
    /// `Authorization: Bearer <access>` iff a credential is held. Without
    /// one the request proceeds unauthenticated and the service rejects
    /// protected endpoints on its own.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.inner.base_url.join(path)?;

        let mut request = self.inner.http.request(method, url);

        let credential = self.inner.session.get().unwrap_or_else(|error| {
            warn!(%error, "session store unreadable; sending request unauthenticated");
            None
        });
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.access_token());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            debug!(%status, %message, "request rejected");
            return Err(ApiError::Status { status, message });
        }

        Ok(response)
    }

    /// Issue a request and decode the JSON response body.
    async fn fetch<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;

        // Read the body as text first for better parse diagnostics.
        let raw = response.text().await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(
                    %error,
                    body = %raw.chars().take(ERROR_BODY_LIMIT).collect::<String>(),
                    "failed to decode response body"
                );
                Err(error.into())
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange a username/password for a credential pair.
    ///
    /// Does not touch the session store; persisting the returned credential
    /// is the caller's decision, which is what keeps a failed re-login from
    /// clobbering a prior session.
    ///
    /// # Errors
    ///
    /// A rejection (bad credentials) surfaces as [`ApiError::Status`].
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Credential, ApiError> {
        let request = LoginRequest { username, password };
        let tokens: TokenPair = self
            .fetch(Method::POST, "token/", Some(&request))
            .await?;

        Ok(Credential::new(tokens.access, tokens.refresh))
    }

    // =========================================================================
    // Product Operations
    // =========================================================================

    /// Fetch all products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch(Method::GET, "products/", None::<&()>).await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// An unknown id surfaces as [`ApiError::Status`] with a 404.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.fetch(Method::GET, &format!("products/{id}/"), None::<&()>)
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        self.fetch(Method::POST, "products/", Some(product)).await
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, product), fields(id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        product: &NewProduct,
    ) -> Result<Product, ApiError> {
        self.fetch(Method::PUT, &format!("products/{id}/"), Some(product))
            .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("products/{id}/"), None::<&()>)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Purchase Operations
    // =========================================================================

    /// Fetch all purchases, each with nested line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_purchases(&self) -> Result<Vec<Purchase>, ApiError> {
        self.fetch(Method::GET, "purchase/", None::<&()>).await
    }

    /// Fetch a single purchase.
    ///
    /// # Errors
    ///
    /// An unknown id surfaces as [`ApiError::Status`] with a 404.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_purchase(&self, id: PurchaseId) -> Result<Purchase, ApiError> {
        self.fetch(Method::GET, &format!("purchase/{id}/"), None::<&()>)
            .await
    }

    /// Record a purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, purchase), fields(customer = %purchase.customer_name))]
    pub async fn create_purchase(&self, purchase: &NewPurchase) -> Result<Purchase, ApiError> {
        self.fetch(Method::POST, "purchase/", Some(purchase)).await
    }

    /// Delete a purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_purchase(&self, id: PurchaseId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &format!("purchase/{id}/"), None::<&()>)
            .await?;
        Ok(())
    }
}

/// Pull a usable message out of an error response body.
///
/// The service wraps rejections as `{"detail": "..."}`; fall back to the
/// raw body, truncated, when it does not.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(detail) = value.get("detail").and_then(|d| d.as_str())
    {
        return detail.to_string();
    }

    let truncated: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if truncated.is_empty() {
        "(no error details provided)".to_string()
    } else {
        truncated
    }
}

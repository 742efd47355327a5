//! Shared test harness: an in-process stub of the SmartStock backend.
//!
//! The stub serves the same HTTP contract the real service does - token
//! issuance, bearer-token enforcement, product CRUD, purchase recording
//! with server-computed line totals - on an ephemeral local port, so the
//! end-to-end tests exercise the client exactly as deployed without any
//! external environment.
//!
//! Every request to the products listing additionally records the
//! `Authorization` header it saw (or its absence), which is what lets tests
//! assert the gateway's header-attachment contract directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tokio::sync::Mutex;

/// Username the stub accepts.
pub const USERNAME: &str = "admin";
/// Password the stub accepts.
pub const PASSWORD: &str = "opensesame";
/// Access token the stub issues and enforces.
pub const ACCESS_TOKEN: &str = "stub-access-token";
/// Refresh token the stub issues.
pub const REFRESH_TOKEN: &str = "stub-refresh-token";

type SharedState = Arc<Mutex<StubState>>;

#[derive(Default)]
struct StubState {
    products: Vec<Value>,
    purchases: Vec<Value>,
    next_product_id: i64,
    next_purchase_id: i64,
    authorization_seen: Vec<Option<String>>,
}

/// Handle to a running stub backend.
pub struct StubBackend {
    /// Base URL to hand to `ClientConfig`, ending in `/api/`.
    pub base_url: String,
    state: SharedState,
}

impl StubBackend {
    /// Start the stub on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound; tests have no way to recover
    /// from that anyway.
    #[allow(clippy::unwrap_used)]
    pub async fn spawn() -> Self {
        let state: SharedState = Arc::new(Mutex::new(StubState {
            next_product_id: 1,
            next_purchase_id: 1,
            ..StubState::default()
        }));

        let app = Router::new()
            .route("/api/token/", post(issue_token))
            .route("/api/products/", get(list_products).post(create_product))
            .route(
                "/api/products/{id}/",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/api/purchase/", get(list_purchases).post(create_purchase))
            .route(
                "/api/purchase/{id}/",
                get(get_purchase).delete(delete_purchase),
            )
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api/"),
            state,
        }
    }

    /// Seed a product directly into the stub, returning its id.
    pub async fn seed_product(
        &self,
        name: &str,
        price: &str,
        quantity: u32,
        category: &str,
    ) -> i64 {
        let mut state = self.state.lock().await;
        let id = state.next_product_id;
        state.next_product_id += 1;
        state.products.push(json!({
            "id": id,
            "name": name,
            "description": format!("{name} (stub)"),
            "price": price,
            "quantity": quantity,
            "expiry_date": Value::Null,
            "category": category,
        }));
        id
    }

    /// The `Authorization` header values the products listing has seen, in
    /// request order; `None` marks a request without the header.
    pub async fn authorization_seen(&self) -> Vec<Option<String>> {
        self.state.lock().await.authorization_seen.clone()
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn issue_token(Json(body): Json<Value>) -> Response {
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        Json(json!({ "access": ACCESS_TOKEN, "refresh": REFRESH_TOKEN })).into_response()
    } else {
        rejection(
            StatusCode::UNAUTHORIZED,
            "No active account found with the given credentials",
        )
    }
}

async fn list_products(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.lock().await;
    state.authorization_seen.push(authorization_header(&headers));

    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    Json(state.products.clone()).into_response()
}

async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let state = state.lock().await;
    state.products.iter().find(|p| p["id"] == id).map_or_else(
        || rejection(StatusCode::NOT_FOUND, "Not found."),
        |product| Json(product.clone()).into_response(),
    )
}

async fn create_product(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let mut state = state.lock().await;
    let id = state.next_product_id;
    state.next_product_id += 1;
    body["id"] = json!(id);
    state.products.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_product(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let mut state = state.lock().await;
    let Some(product) = state.products.iter_mut().find(|p| p["id"] == id) else {
        return rejection(StatusCode::NOT_FOUND, "Not found.");
    };
    body["id"] = json!(id);
    *product = body.clone();
    Json(body).into_response()
}

async fn delete_product(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let mut state = state.lock().await;
    state.products.retain(|p| p["id"] != id);
    StatusCode::NO_CONTENT.into_response()
}

async fn list_purchases(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }
    Json(state.lock().await.purchases.clone()).into_response()
}

async fn get_purchase(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let state = state.lock().await;
    state.purchases.iter().find(|p| p["id"] == id).map_or_else(
        || rejection(StatusCode::NOT_FOUND, "Not found."),
        |purchase| Json(purchase.clone()).into_response(),
    )
}

#[allow(clippy::unwrap_used)]
async fn create_purchase(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let mut state = state.lock().await;

    let Some(items) = body["items"].as_array() else {
        return rejection(StatusCode::BAD_REQUEST, "items is required");
    };
    if items.is_empty() {
        return rejection(StatusCode::BAD_REQUEST, "items must not be empty");
    }

    // Resolve each line against the product store and compute the totals
    // the way the real service does.
    let mut stored_items = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let product_id = item["product"].as_i64();
        let Some(product) = state
            .products
            .iter()
            .find(|p| p["id"].as_i64() == product_id)
        else {
            return rejection(StatusCode::BAD_REQUEST, "unknown product in items");
        };

        let quantity = item["quantity"].as_u64().unwrap_or(1);
        let unit_price: Decimal = product["price"].as_str().unwrap_or("0").parse().unwrap();
        let total = unit_price * Decimal::from(quantity);

        stored_items.push(json!({
            "id": i64::try_from(index).unwrap() + 1,
            "product_name": product["name"],
            "product_price": product["price"],
            "quantity": quantity,
            "total_price": total.to_string(),
        }));
    }

    let id = state.next_purchase_id;
    state.next_purchase_id += 1;
    let purchase = json!({
        "id": id,
        "customer_name": body["customer_name"],
        "purchase_date": Utc::now().to_rfc3339(),
        "items": stored_items,
    });
    state.purchases.push(purchase.clone());
    (StatusCode::CREATED, Json(purchase)).into_response()
}

async fn delete_purchase(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&headers) {
        return denied;
    }

    let mut state = state.lock().await;
    state.purchases.retain(|p| p["id"] != id);
    StatusCode::NO_CONTENT.into_response()
}

// =============================================================================
// Helpers
// =============================================================================

fn authorization_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}

/// Enforce the bearer token exactly as the real service does.
fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    match authorization_header(headers) {
        Some(value) if value == format!("Bearer {ACCESS_TOKEN}") => Ok(()),
        Some(_) => Err(rejection(
            StatusCode::UNAUTHORIZED,
            "Given token not valid for any token type",
        )),
        None => Err(rejection(
            StatusCode::UNAUTHORIZED,
            "Authentication credentials were not provided.",
        )),
    }
}

fn rejection(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

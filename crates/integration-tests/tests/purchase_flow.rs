//! End-to-end tests for purchase recording, aggregation, and receipt
//! export, against the in-process stub backend.

use chrono::Utc;
use rust_decimal::Decimal;

use smartstock_client::{ApiClient, ClientConfig, Receipt, ReceiptError, SessionStore};
use smartstock_core::{
    NewPurchase, NewPurchaseItem, ProductId, Purchase, PurchaseId,
};
use smartstock_integration_tests::{PASSWORD, StubBackend, USERNAME};

async fn logged_in_client(backend: &StubBackend, dir: &tempfile::TempDir) -> ApiClient {
    let config = ClientConfig::new(&backend.base_url, dir.path().join("session.json"))
        .expect("stub base URL is valid");
    let store = SessionStore::new(&config.session_file);
    let client = ApiClient::new(&config, store.clone()).expect("client builds");

    let credential = client.login(USERNAME, PASSWORD).await.expect("login succeeds");
    store.set(&credential).expect("session persists");
    client
}

#[tokio::test]
async fn test_recorded_purchase_totals() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = logged_in_client(&backend, &dir).await;

    let tea = backend.seed_product("Green Tea", "10.00", 50, "Beverages").await;
    let biscuits = backend.seed_product("Biscuits", "5.50", 80, "Snacks").await;

    let created = client
        .create_purchase(&NewPurchase {
            customer_name: "Ada Lovelace".to_string(),
            items: vec![
                NewPurchaseItem {
                    product: ProductId::new(tea),
                    quantity: 2,
                },
                NewPurchaseItem {
                    product: ProductId::new(biscuits),
                    quantity: 3,
                },
            ],
        })
        .await
        .expect("purchase records");

    // 10.00 x 2 + 5.50 x 3
    assert_eq!(created.grand_total(), Decimal::new(3650, 2));
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.items[0].line_total, Some(Decimal::new(2000, 2)));

    // The fetched copy agrees with the created one.
    let fetched = client.get_purchase(created.id).await.expect("fetch succeeds");
    assert_eq!(fetched.customer_name, "Ada Lovelace");
    assert_eq!(fetched.grand_total(), created.grand_total());
}

#[tokio::test]
async fn test_purchase_listing_and_delete() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = logged_in_client(&backend, &dir).await;

    let id = backend.seed_product("Salt", "0.99", 10, "Pantry").await;
    let created = client
        .create_purchase(&NewPurchase {
            customer_name: "Charles".to_string(),
            items: vec![NewPurchaseItem {
                product: ProductId::new(id),
                quantity: 1,
            }],
        })
        .await
        .expect("purchase records");

    assert_eq!(client.list_purchases().await.expect("list").len(), 1);

    client.delete_purchase(created.id).await.expect("delete succeeds");
    assert!(client.list_purchases().await.expect("list").is_empty());

    let error = client.get_purchase(created.id).await.expect_err("gone");
    assert_eq!(error.status(), Some(reqwest::StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_receipt_export_round_trip() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = logged_in_client(&backend, &dir).await;

    let id = backend.seed_product("Green Tea", "12.50", 40, "Beverages").await;
    let created = client
        .create_purchase(&NewPurchase {
            customer_name: "Ada".to_string(),
            items: vec![NewPurchaseItem {
                product: ProductId::new(id),
                quantity: 2,
            }],
        })
        .await
        .expect("purchase records");

    let purchase = client.get_purchase(created.id).await.expect("fetch succeeds");
    let receipt = Receipt::new(&purchase).expect("purchase has items");

    assert_eq!(receipt.grand_total(), Decimal::new(2500, 2));

    let path = dir.path().join(receipt.file_name());
    receipt.save(&path).expect("save succeeds");

    let bytes = std::fs::read(&path).expect("artifact exists");
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_empty_purchase_cannot_be_exported() {
    // An item-less purchase never comes back from the service, but a
    // defensive caller can still hold one; export must refuse it outright.
    let empty = Purchase {
        id: PurchaseId::new(99),
        customer_name: "Nobody".to_string(),
        purchase_date: Utc::now(),
        items: vec![],
    };

    let result = Receipt::new(&empty);
    assert!(matches!(
        result,
        Err(ReceiptError::EmptyPurchase(id)) if id == PurchaseId::new(99)
    ));
}

#[tokio::test]
async fn test_empty_submission_is_rejected_by_the_service() {
    let backend = StubBackend::spawn().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let client = logged_in_client(&backend, &dir).await;

    let error = client
        .create_purchase(&NewPurchase {
            customer_name: "Nobody".to_string(),
            items: vec![],
        })
        .await
        .expect_err("empty submission is invalid");
    assert_eq!(error.status(), Some(reqwest::StatusCode::BAD_REQUEST));
}

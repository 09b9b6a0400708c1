//! Integration tests for cart persistence across restarts.
//!
//! These tests run the storefront against a real data directory and check
//! what lands on disk and what a fresh process reads back.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_decimal::Decimal;
use serde_json::json;
use webshop_core::OptionMatching;
use webshop_integration_tests::{TestApp, line_items, send};
use webshop_storefront::cart::CartStore;
use webshop_storefront::storage::FileStore;

fn load(app: &TestApp) -> CartStore {
    let storage = FileStore::open(app.data_dir()).unwrap();
    CartStore::load(Arc::new(storage), OptionMatching::Exact)
}

#[tokio::test]
async fn test_every_mutation_is_written() {
    let app = TestApp::new();

    app.post(
        "/api/cart/add",
        &json!({ "product_id": "2", "quantity": 2, "selected_options": { "Size": "XL", "Color": "Gray" } }),
    )
    .await;
    let stored = app.stored_cart().unwrap();
    assert_eq!(stored[0]["quantity"], 2);
    assert_eq!(
        stored[0]["selectedOptions"],
        json!({ "Color": "Gray", "Size": "XL" })
    );
    assert_eq!(stored[0]["product"]["name"], "Modern Hoodie");

    app.post("/api/cart/add", &json!({ "product_id": "5" })).await;
    let stored = app.stored_cart().unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 2);
    assert!(stored[1].get("selectedOptions").is_none());

    app.post(
        "/api/cart/update",
        &json!({ "product_id": "5", "quantity": 0 }),
    )
    .await;
    assert_eq!(app.stored_cart().unwrap().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let app = TestApp::new();
    app.post("/api/cart/add", &json!({ "product_id": "3", "quantity": 2 }))
        .await;
    app.post("/api/cart/add", &json!({ "product_id": "4" })).await;

    let restarted = app.restart();
    let response = send(&restarted, Request::get("/api/cart").body(Body::empty())).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        line_items(&response.body),
        [("3".to_string(), 2), ("4".to_string(), 1)]
    );

    let cart = load(&app);
    assert_eq!(cart.cart_item_count(), 3);
    assert_eq!(cart.cart_total(), Decimal::new(49997, 2));
}

#[tokio::test]
async fn test_restart_keeps_option_matching() {
    let app = TestApp::with_matching(OptionMatching::Lenient);
    app.post(
        "/api/cart/add",
        &json!({ "product_id": "2", "selected_options": { "Size": "L", "Color": "Gray" } }),
    )
    .await;

    let restarted = app.restart();
    let update = Request::post("/api/cart/update")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "product_id": "2", "quantity": 4 }).to_string()));
    let response = send(&restarted, update).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(line_items(&response.body), [("2".to_string(), 4)]);
}

#[tokio::test]
async fn test_corrupt_store_starts_empty() {
    let app = TestApp::new();
    fs::write(app.data_dir().join("cartItems.json"), "{ not json").unwrap();

    let restarted = app.restart();
    let response = send(&restarted, Request::get("/api/cart").body(Body::empty())).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(line_items(&response.body).is_empty());
}

#[test]
fn test_legacy_data_is_settled_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let tee = json!({
        "id": "1",
        "name": "Classic Tee",
        "description": "A comfortable and stylish classic t-shirt.",
        "price": 29.99,
        "imageUrl": "https://picsum.photos/400/400",
        "category": "Apparel",
        "stock": 100
    });
    let legacy = json!([
        { "product": tee, "quantity": 1, "selectedOptions": null },
        { "product": tee, "quantity": 2 },
        { "product": tee, "quantity": 0, "selectedOptions": { "Size": "M" } }
    ]);
    fs::write(dir.path().join("cartItems.json"), legacy.to_string()).unwrap();

    let storage = FileStore::open(dir.path()).unwrap();
    let cart = CartStore::load(Arc::new(storage), OptionMatching::Exact);

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.cart_item_count(), 3);
    assert_eq!(cart.cart_total(), Decimal::new(8997, 2));
}

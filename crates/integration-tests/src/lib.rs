//! Integration tests for Modern Webshop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p webshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - HTTP endpoints driven through the router
//! - `cart_persistence` - Cart store against the file store
//!
//! [`TestApp`] builds the real router over the demo catalog and a cart
//! stored in a temporary directory. Requests go straight to the router with
//! `tower::ServiceExt::oneshot`; no socket is opened.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use webshop_core::OptionMatching;
use webshop_storefront::cart::CartStore;
use webshop_storefront::catalog::InMemoryCatalog;
use webshop_storefront::config::StorefrontConfig;
use webshop_storefront::state::AppState;
use webshop_storefront::storage::{CART_STORAGE_KEY, FileStore, KeyValueStore};

/// A storefront wired to a throwaway data directory.
pub struct TestApp {
    router: Router,
    config: StorefrontConfig,
    data_dir: TempDir,
}

/// Status, headers and decoded body of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub request_id: Option<String>,
    /// JSON body, or `Value::String` for a non-JSON body.
    pub body: Value,
}

impl TestApp {
    /// App with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self::with_matching(OptionMatching::Exact)
    }

    /// App using the given option-matching mode.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn with_matching(matching: OptionMatching) -> Self {
        let data_dir = tempfile::tempdir().expect("create temp dir");
        let config = StorefrontConfig {
            data_dir: data_dir.path().to_path_buf(),
            option_matching: matching,
            ..StorefrontConfig::default()
        };
        let router = build_router(config.clone());
        Self {
            router,
            config,
            data_dir,
        }
    }

    /// Directory holding the persisted cart.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }

    /// Raw JSON stored under the cart key, if any.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be read or holds invalid JSON.
    #[must_use]
    pub fn stored_cart(&self) -> Option<Value> {
        let store = FileStore::open(self.data_dir()).expect("open store");
        store
            .get(CART_STORAGE_KEY)
            .expect("read store")
            .map(|raw| serde_json::from_str(&raw).expect("stored cart is JSON"))
    }

    /// Build a second app with the same configuration and data directory,
    /// as after a restart.
    #[must_use]
    pub fn restart(&self) -> Router {
        build_router(self.config.clone())
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        send(&self.router, Request::get(uri).body(Body::empty())).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        send(&self.router, json_request(uri, body)).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

fn build_router(config: StorefrontConfig) -> Router {
    let storage = FileStore::open(PathBuf::from(&config.data_dir)).expect("open store");
    let cart = CartStore::load(Arc::new(storage), config.option_matching);
    webshop_storefront::app(AppState::new(config, InMemoryCatalog::demo(), cart))
}

fn json_request(uri: &str, body: &Value) -> Result<Request<Body>, axum::http::Error> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
}

/// Send one request through `router`.
///
/// # Panics
///
/// Panics if the request cannot be built or the body cannot be read.
pub async fn send(
    router: &Router,
    request: Result<Request<Body>, axum::http::Error>,
) -> TestResponse {
    let request = request.expect("build request");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");

    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    TestResponse {
        status,
        request_id,
        body,
    }
}

/// Line items of a cart snapshot as `(product id, quantity)` pairs.
#[must_use]
pub fn line_items(snapshot: &Value) -> Vec<(String, u64)> {
    snapshot["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    (
                        item["product"]["id"].as_str().unwrap_or_default().to_string(),
                        item["quantity"].as_u64().unwrap_or_default(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

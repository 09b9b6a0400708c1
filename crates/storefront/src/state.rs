//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::cart::CartStore;
use crate::catalog::ProductRepository;
use crate::config::StorefrontConfig;
use crate::error::AppError;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the cart and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Box<dyn ProductRepository>,
    cart: Mutex<CartStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Product repository served by the API
    /// * `cart` - The loaded cart store
    pub fn new(
        config: StorefrontConfig,
        catalog: impl ProductRepository + 'static,
        cart: CartStore,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Box::new(catalog),
                cart: Mutex::new(cart),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn ProductRepository {
        self.inner.catalog.as_ref()
    }

    /// Lock the cart for one operation.
    ///
    /// The guard must be dropped before the next `.await`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if a previous holder panicked.
    pub fn cart(&self) -> Result<MutexGuard<'_, CartStore>, AppError> {
        self.inner
            .cart
            .lock()
            .map_err(|_| AppError::Internal("cart lock poisoned".to_string()))
    }
}

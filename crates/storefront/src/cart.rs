//! The shopper's cart: engine, persistence and change notification.
//!
//! [`CartStore`] wraps the core [`Cart`] with a durable store and a watch
//! channel. There is one store per process; it is built once at start-up
//! and shared through `AppState`.
//!
//! Every effective mutation ends in [`CartStore::commit`], which writes the
//! full line-item list under [`CART_STORAGE_KEY`] and then publishes a new
//! [`CartSnapshot`] to subscribers. A failed write is logged and otherwise
//! ignored: the in-memory cart stays authoritative.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::watch;
use webshop_core::{
    Cart, CartError, CartLineItem, OptionMatching, Product, ProductId, SelectedOptions,
};

use crate::storage::{CART_STORAGE_KEY, KeyValueStore};

/// Point-in-time view of the cart handed to observers and API clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub item_count: u64,
    pub total: Decimal,
}

impl From<&Cart> for CartSnapshot {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            item_count: cart.item_count(),
            total: cart.total(),
        }
    }
}

/// Convert a caller-supplied signed quantity: negatives become 0 and
/// values past `u32::MAX` saturate.
#[must_use]
pub fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

/// The application's single cart.
pub struct CartStore {
    cart: Cart,
    storage: Arc<dyn KeyValueStore>,
    changes: watch::Sender<CartSnapshot>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("subscribers", &self.changes.receiver_count())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Restore the cart from `storage`.
    ///
    /// A missing entry gives an empty cart. An unreadable or corrupt entry
    /// also gives an empty cart, with a warning; start-up never fails on bad
    /// stored data.
    pub fn load(storage: Arc<dyn KeyValueStore>, matching: OptionMatching) -> Self {
        let cart = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
                Ok(items) => {
                    let stored = items.len();
                    match Cart::from_items(items, matching) {
                        Ok(cart) => {
                            if cart.len() != stored {
                                tracing::info!(
                                    stored,
                                    kept = cart.len(),
                                    "Settled stored cart (merged duplicates or dropped empty lines)"
                                );
                            }
                            cart
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Stored cart is unusable, starting empty");
                            Cart::new(matching)
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stored cart is corrupt, starting empty");
                    Cart::new(matching)
                }
            },
            Ok(None) => Cart::new(matching),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored cart, starting empty");
                Cart::new(matching)
            }
        };

        tracing::debug!(
            line_items = cart.len(),
            matching = %matching,
            "Cart loaded"
        );

        let (changes, _) = watch::channel(CartSnapshot::from(&cart));
        Self {
            cart,
            storage,
            changes,
        }
    }

    /// Current line items, in cart order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        self.cart.items()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from(&self.cart)
    }

    /// Watch the cart. The receiver starts at the current state and sees a
    /// new snapshot after every effective mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.changes.subscribe()
    }

    /// The durable store backing this cart.
    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    /// Add `quantity` of a product snapshot with the chosen options.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] for a zero quantity or options that do not fit
    /// the product. Nothing is written on error.
    pub fn add_to_cart(
        &mut self,
        product: Product,
        quantity: u32,
        options: SelectedOptions,
    ) -> Result<(), CartError> {
        let product_id = product.id.clone();
        self.cart.add(product, quantity, options)?;
        tracing::debug!(%product_id, quantity, "Added to cart");
        self.commit();
        Ok(())
    }

    /// Remove the matching line item. Absent line items are ignored.
    pub fn remove_from_cart(&mut self, product_id: &ProductId, options: &SelectedOptions) {
        if self.cart.remove(product_id, options) {
            tracing::debug!(%product_id, "Removed from cart");
            self.commit();
        }
    }

    /// Set the matching line item's quantity; zero or less removes it.
    /// Absent line items are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the cart total would not fit.
    /// Nothing is written on error.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
        options: &SelectedOptions,
    ) -> Result<(), CartError> {
        if self
            .cart
            .update_quantity(product_id, clamp_quantity(quantity), options)?
        {
            tracing::debug!(%product_id, quantity, "Updated cart quantity");
            self.commit();
        }
        Ok(())
    }

    /// Empty the cart. Always written, so the store matches even if it
    /// drifted.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        tracing::debug!("Cleared cart");
        self.commit();
    }

    /// Sum of price times quantity. Not rounded.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.total()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn cart_item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Persist the cart, then notify subscribers.
    fn commit(&self) {
        self.persist();
        self.changes.send_replace(self.snapshot());
    }

    fn persist(&self) {
        let json = match serde_json::to_string(self.cart.items()) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.storage.set(CART_STORAGE_KEY, &json) {
            tracing::error!(
                error = %e,
                key = CART_STORAGE_KEY,
                "Failed to persist cart, keeping in-memory state"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use webshop_core::{Price, ProductOption};

    fn tee() -> Product {
        Product::new("1", "Classic Tee", Price::parse("29.99").unwrap())
            .with_option(ProductOption::new("Size", ["S", "M", "L", "XL"]))
    }

    fn hoodie() -> Product {
        Product::new("2", "Modern Hoodie", Price::parse("59.99").unwrap())
            .with_option(ProductOption::new("Size", ["M", "L", "XL"]))
    }

    fn size(value: &str) -> SelectedOptions {
        SelectedOptions::new().with("Size", value)
    }

    fn stored_items(store: &CartStore) -> Vec<CartLineItem> {
        let raw = store.storage().get(CART_STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn memory_store() -> (Arc<MemoryStore>, CartStore) {
        let memory = Arc::new(MemoryStore::new());
        let store = CartStore::load(memory.clone(), OptionMatching::Exact);
        (memory, store)
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let (_, mut store) = memory_store();

        store.add_to_cart(tee(), 2, SelectedOptions::new()).unwrap();
        assert_eq!(stored_items(&store), store.items());

        store.add_to_cart(hoodie(), 1, size("M")).unwrap();
        store.update_quantity(&ProductId::new("1"), 5, &SelectedOptions::new()).unwrap();
        assert_eq!(stored_items(&store), store.items());
        assert_eq!(stored_items(&store)[0].quantity, 5);

        store.remove_from_cart(&ProductId::new("2"), &size("M"));
        assert_eq!(stored_items(&store).len(), 1);
    }

    #[test]
    fn test_clear_persists_empty_array() {
        let (memory, mut store) = memory_store();
        store.add_to_cart(tee(), 3, size("L")).unwrap();
        store.clear_cart();

        assert_eq!(store.cart_item_count(), 0);
        assert_eq!(
            memory.get(CART_STORAGE_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_round_trip_through_storage() {
        let memory = Arc::new(MemoryStore::new());
        let mut first = CartStore::load(memory.clone(), OptionMatching::Exact);
        first.add_to_cart(tee(), 2, size("M")).unwrap();
        first.add_to_cart(hoodie(), 1, size("XL")).unwrap();
        first.add_to_cart(tee(), 1, SelectedOptions::new()).unwrap();

        let second = CartStore::load(memory, OptionMatching::Exact);
        assert_eq!(second.items(), first.items());
        assert_eq!(second.cart_total(), first.cart_total());
    }

    #[test]
    fn test_file_backed_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStore::open(dir.path()).unwrap());
        let mut first = CartStore::load(storage.clone(), OptionMatching::Exact);
        first.add_to_cart(hoodie(), 4, size("L")).unwrap();

        let second = CartStore::load(storage, OptionMatching::Exact);
        assert_eq!(second.items(), first.items());
        assert_eq!(second.cart_item_count(), 4);
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let memory = Arc::new(MemoryStore::with_entry(CART_STORAGE_KEY, "{not json"));
        let store = CartStore::load(memory, OptionMatching::Exact);
        assert!(store.items().is_empty());
        assert_eq!(store.cart_total(), Decimal::ZERO);
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let memory = Arc::new(MemoryStore::with_entry(
            CART_STORAGE_KEY,
            r#"[{"product": {"id": "1"}, "quantity": -2}]"#,
        ));
        let store = CartStore::load(memory, OptionMatching::Exact);
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_untotallable_storage_loads_empty() {
        let memory = Arc::new(MemoryStore::with_entry(
            CART_STORAGE_KEY,
            r#"[{"product": {"id": "1", "name": "Vault", "description": "",
                 "price": "79228162514264337593543950335", "imageUrl": "",
                 "category": "Misc", "stock": 1}, "quantity": 2}]"#,
        ));
        let mut store = CartStore::load(memory, OptionMatching::Exact);
        assert!(store.items().is_empty());
        assert_eq!(store.cart_total(), Decimal::ZERO);

        store.add_to_cart(tee(), 1, size("M")).unwrap();
        assert_eq!(store.cart_total(), Decimal::new(2999, 2));
    }

    #[test]
    fn test_update_that_overflows_is_not_written() {
        let (memory, mut store) = memory_store();
        let vault = Product::new("9", "Vault", Price::new(Decimal::MAX).unwrap());
        store.add_to_cart(vault, 1, SelectedOptions::new()).unwrap();
        let before = memory.get(CART_STORAGE_KEY).unwrap();

        let result = store.update_quantity(&ProductId::new("9"), 3, &SelectedOptions::new());
        assert_eq!(result, Err(CartError::TotalOverflow));
        assert_eq!(store.items()[0].quantity, 1);
        assert_eq!(memory.get(CART_STORAGE_KEY).unwrap(), before);
    }

    #[test]
    fn test_load_settles_duplicates() {
        let items = vec![
            CartLineItem::new(tee(), 1, size("M")),
            CartLineItem::new(tee(), 2, size("M")),
        ];
        let memory = Arc::new(MemoryStore::with_entry(
            CART_STORAGE_KEY,
            &serde_json::to_string(&items).unwrap(),
        ));
        let store = CartStore::load(memory, OptionMatching::Exact);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].quantity, 3);
    }

    #[test]
    fn test_failed_write_keeps_memory_authoritative() {
        let (memory, mut store) = memory_store();
        store.add_to_cart(tee(), 1, size("S")).unwrap();
        memory.fail_writes(true);

        store.add_to_cart(tee(), 2, size("S")).unwrap();
        assert_eq!(store.items()[0].quantity, 3);
        assert_eq!(store.cart_item_count(), 3);

        // The store still holds the last successful write.
        assert_eq!(stored_items(&store)[0].quantity, 1);

        memory.fail_writes(false);
        store.update_quantity(&ProductId::new("1"), 7, &size("S")).unwrap();
        assert_eq!(stored_items(&store)[0].quantity, 7);
    }

    #[test]
    fn test_subscribers_see_mutations() {
        let (_, mut store) = memory_store();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.add_to_cart(tee(), 2, size("M")).unwrap();
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.item_count, 2);
        assert_eq!(snapshot.total, Decimal::new(5998, 2));
        assert_eq!(snapshot.items.len(), 1);

        store.clear_cart();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().item_count, 0);
    }

    #[test]
    fn test_noops_do_not_notify_or_write() {
        let (memory, mut store) = memory_store();
        let mut rx = store.subscribe();

        store.remove_from_cart(&ProductId::new("404"), &SelectedOptions::new());
        store.update_quantity(&ProductId::new("404"), 3, &SelectedOptions::new()).unwrap();
        assert!(store.add_to_cart(tee(), 0, SelectedOptions::new()).is_err());

        assert!(!rx.has_changed().unwrap());
        assert_eq!(memory.get(CART_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_negative_update_removes() {
        let (_, mut store) = memory_store();
        store.add_to_cart(tee(), 2, size("M")).unwrap();
        store.update_quantity(&ProductId::new("1"), -4, &size("M")).unwrap();
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let (_, mut store) = memory_store();
        store.add_to_cart(tee(), 1, size("M")).unwrap();
        let before = store.snapshot();
        store.add_to_cart(tee(), 1, size("M")).unwrap();
        assert_eq!(before.items[0].quantity, 1);
        assert_eq!(store.snapshot().items[0].quantity, 2);
    }

    #[test]
    fn test_line_items_keep_product_snapshot() {
        let (_, mut store) = memory_store();
        let mut product = tee();
        store.add_to_cart(product.clone(), 1, size("M")).unwrap();

        product.price = Price::parse("1.00").unwrap();
        store.add_to_cart(product, 1, size("M")).unwrap();

        assert_eq!(store.items()[0].product.price, Price::parse("29.99").unwrap());
        assert_eq!(store.cart_total(), Decimal::new(5998, 2));
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(-5), 0);
        assert_eq!(clamp_quantity(0), 0);
        assert_eq!(clamp_quantity(12), 12);
        assert_eq!(clamp_quantity(i64::MAX), u32::MAX);
    }
}

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{seed_products, Product};

/// In-memory product table shared by every request.
///
/// Each method takes the lock exactly once, so a single call never observes a
/// half-applied write. Compound decisions (create-unless-present,
/// update-if-present, delete-if-present) have their own methods that run
/// under one write lock; callers should prefer those over pairing
/// `contains_key` with `put` or `remove`.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: RwLock<BTreeMap<String, Product>>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with the three catalog seeds (P001..P003).
    pub fn seeded() -> Self {
        let store = Self::new();
        for product in seed_products() {
            store.put(product.id.clone(), product);
        }
        store
    }

    // A panic while holding the lock cannot leave the map half-written:
    // every mutation is a single BTreeMap call. Poisoning is therefore ignored.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Product>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Product>> {
        self.products.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every product, ordered by id.
    pub fn list_all(&self) -> Vec<Product> {
        self.read().values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.read().get(id).cloned()
    }

    /// Insert or overwrite unconditionally.
    pub fn put(&self, id: impl Into<String>, product: Product) {
        self.write().insert(id.into(), product);
    }

    pub fn contains_key(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Idempotent: removing a missing id is a no-op.
    pub fn remove(&self, id: &str) {
        self.write().remove(id);
    }

    pub fn size(&self) -> usize {
        self.read().len()
    }

    /// Insert only if no product holds `product.id`. Returns whether it was stored.
    pub fn insert_if_absent(&self, product: Product) -> bool {
        let mut products = self.write();
        if products.contains_key(&product.id) {
            return false;
        }
        products.insert(product.id.clone(), product);
        true
    }

    /// Assign an id derived from the current size and insert, atomically.
    ///
    /// On collision the store is left untouched and the generated id is
    /// returned as the error.
    pub fn insert_generated<F>(&self, generate: F, product: Product) -> Result<Product, String>
    where
        F: FnOnce(usize) -> String,
    {
        let mut products = self.write();
        let id = generate(products.len());
        if products.contains_key(&id) {
            return Err(id);
        }
        let product = product.with_id(id.clone());
        products.insert(id, product.clone());
        Ok(product)
    }

    /// Overwrite the entry at `id` only if it exists. Returns the previous value.
    pub fn replace_if_present(&self, id: &str, product: Product) -> Option<Product> {
        let mut products = self.write();
        let slot = products.get_mut(id)?;
        Some(std::mem::replace(slot, product))
    }

    /// Remove and return the entry at `id`, if any.
    pub fn remove_if_present(&self, id: &str) -> Option<Product> {
        self.write().remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn sample(id: &str, name: &str) -> Product {
        Product::new(id, name, "", Decimal::new(100, 2), "Test")
    }

    #[test]
    fn seeded_store_has_three_products_in_id_order() {
        let store = ProductStore::seeded();
        let ids: Vec<String> = store.list_all().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["P001", "P002", "P003"]);
        assert_eq!(store.size(), 3);
    }

    #[test]
    fn put_overwrites_and_remove_is_idempotent() {
        let store = ProductStore::new();
        store.put("A", sample("A", "first"));
        store.put("A", sample("A", "second"));
        assert_eq!(store.get("A").unwrap().name, "second");
        assert_eq!(store.size(), 1);

        store.remove("A");
        store.remove("A");
        assert!(!store.contains_key("A"));
        assert!(store.get("A").is_none());
    }

    #[test]
    fn insert_if_absent_keeps_first_writer() {
        let store = ProductStore::new();
        assert!(store.insert_if_absent(sample("A", "first")));
        assert!(!store.insert_if_absent(sample("A", "second")));
        assert_eq!(store.get("A").unwrap().name, "first");
    }

    #[test]
    fn insert_generated_reports_collision() {
        let store = ProductStore::new();
        let next = |size: usize| format!("P{}", size + 1);

        assert_eq!(store.insert_generated(next, sample("", "one")).unwrap().id, "P1");
        assert_eq!(store.insert_generated(next, sample("", "two")).unwrap().id, "P2");

        // one entry left after the delete, so the generator lands on P2 again
        store.remove("P1");
        let result = store.insert_generated(next, sample("", "three"));
        assert_eq!(result, Err("P2".to_string()));
        assert_eq!(store.get("P2").unwrap().name, "two");
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn replace_and_remove_if_present() {
        let store = ProductStore::seeded();
        assert!(store.replace_if_present("P999", sample("P999", "x")).is_none());
        assert!(!store.contains_key("P999"));

        let previous = store.replace_if_present("P001", sample("P001", "Desktop")).unwrap();
        assert_eq!(previous.name, "Laptop");
        assert_eq!(store.get("P001").unwrap().name, "Desktop");

        assert!(store.remove_if_present("P001").is_some());
        assert!(store.remove_if_present("P001").is_none());
    }

    #[test]
    fn concurrent_generated_inserts_never_share_an_id() {
        let store = Arc::new(ProductStore::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.insert_generated(|size| format!("P{}", size + 1), sample("", "t"))
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        assert_eq!(store.size(), 16);
    }
}

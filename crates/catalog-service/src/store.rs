//! In-memory product store.
//!
//! Persistence and query construction are external concerns; this store
//! carries the state the service and its bus handlers operate on.

use dashmap::DashMap;
use shared_types::{Product, StockAdjustment};

/// Product records keyed by id.
pub struct ProductStore {
    products: DashMap<String, Product>,
}

impl ProductStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
        }
    }

    pub fn insert(&self, product: Product) -> Product {
        self.products.insert(product.id.clone(), product.clone());
        product
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Product> {
        self.products.get(id).map(|entry| entry.clone())
    }

    /// Fetch the subset of `ids` that exist, in input order.
    #[must_use]
    pub fn get_many(&self, ids: &[String]) -> Vec<Product> {
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Every product, ordered by id for stable listings.
    #[must_use]
    pub fn all(&self) -> Vec<Product> {
        let mut all: Vec<Product> = self.products.iter().map(|entry| entry.clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    #[must_use]
    pub fn by_seller(&self, seller_id: &str) -> Vec<Product> {
        self.products
            .iter()
            .filter(|entry| entry.seller_id == seller_id)
            .map(|entry| entry.clone())
            .collect()
    }

    pub fn remove(&self, id: &str) -> Option<Product> {
        self.products.remove(id).map(|(_, product)| product)
    }

    pub fn remove_many(&self, ids: &[String]) -> usize {
        ids.iter().filter(|id| self.remove(id).is_some()).count()
    }

    /// Apply stock decrements, clamping quantities at zero.
    ///
    /// Unknown product ids are skipped. Returns the updated products.
    pub fn adjust_quantities(&self, adjustment: &StockAdjustment) -> Vec<Product> {
        let mut updated = Vec::new();
        for (id, decrement) in adjustment {
            if let Some(mut entry) = self.products.get_mut(id) {
                entry.quantity = entry.quantity.saturating_sub(*decrement);
                updated.push(entry.clone());
            }
        }
        updated
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

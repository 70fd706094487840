//! In-memory order store.

use dashmap::DashMap;
use shared_types::{Order, OrderStatus};

/// Order records keyed by id.
pub struct OrderStore {
    orders: DashMap<String, Order>,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
        }
    }

    pub fn insert(&self, order: Order) -> Order {
        self.orders.insert(order.id.clone(), order.clone());
        order
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Order> {
        self.orders.get(id).map(|entry| entry.clone())
    }

    #[must_use]
    pub fn by_buyer(&self, buyer_id: &str) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|entry| entry.buyer_id == buyer_id)
            .map(|entry| entry.clone())
            .collect()
    }

    /// Flip an order to cancelled. Returns the updated order.
    pub fn cancel(&self, id: &str) -> Option<Order> {
        self.orders.get_mut(id).map(|mut entry| {
            entry.status = OrderStatus::Cancelled;
            entry.clone()
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

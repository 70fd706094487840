//! Order operations.

use crate::clients::CatalogClient;
use crate::store::OrderStore;
use serde::{Deserialize, Serialize};
use shared_rpc::{guarded, AccessGate, InboundCall};
use shared_types::{Envelope, Order, OrderLine, OrderStatus, Product, StockAdjustment};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One requested line of a new order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
}

/// The order service facade.
pub struct OrderService {
    store: Arc<OrderStore>,
    catalog: CatalogClient,
    gate: AccessGate,
}

impl OrderService {
    pub fn new(store: Arc<OrderStore>, catalog: CatalogClient, gate: AccessGate) -> Self {
        Self {
            store,
            catalog,
            gate,
        }
    }

    /// Place an order for the calling buyer.
    ///
    /// Composes two catalog calls in sequence: batch lookup (existence,
    /// price, stock), then stock adjustment. Each runs to completion
    /// before the next; a failure aborts the flow and surfaces in the
    /// returned envelope.
    pub async fn place_order(&self, call: InboundCall, items: Vec<OrderItem>) -> Envelope {
        let store = Arc::clone(&self.store);
        let catalog = &self.catalog;
        guarded(&self.gate, call, |scope| async move {
            let Some(identity) = scope.identity() else {
                return Envelope::unauthorized("Missing credential");
            };
            if items.is_empty() {
                return Envelope::bad_request("Order has no items");
            }

            let ids: Vec<String> = items.iter().map(|item| item.product_id.clone()).collect();
            let products = match catalog.get_products(&ids).await {
                Ok(products) => products,
                Err(abort) => return abort,
            };
            let by_id: HashMap<&str, &Product> =
                products.iter().map(|p| (p.id.as_str(), p)).collect();

            let mut unavailable = Vec::new();
            let mut lines = Vec::new();
            for item in &items {
                match by_id.get(item.product_id.as_str()) {
                    Some(product) if product.quantity >= item.quantity && product.active => {
                        lines.push(OrderLine {
                            product_id: product.id.clone(),
                            quantity: item.quantity,
                            unit_price: product.price,
                        });
                    }
                    _ => unavailable.push(item.product_id.clone()),
                }
            }
            if !unavailable.is_empty() {
                return Envelope::build(
                    400,
                    "Some products are unavailable",
                    serde_json::to_value(&unavailable).ok(),
                );
            }

            let adjustment: StockAdjustment = items
                .iter()
                .map(|item| (item.product_id.clone(), item.quantity))
                .collect();
            if let Err(abort) = catalog.adjust_quantities(&adjustment).await {
                // No rollback of prior sub-calls; the failure surfaces to
                // the caller instead.
                return abort;
            }

            let mut order = Order {
                id: Uuid::new_v4().to_string(),
                buyer_id: identity.id.clone(),
                lines,
                total: 0.0,
                status: OrderStatus::Confirmed,
            };
            order.total = order.computed_total();
            let order = store.insert(order);

            info!(order = %order.id, buyer = %identity.id, "Order placed");
            Envelope::created(&order, "Order placed successfully")
        })
        .await
    }

    /// List the calling buyer's orders.
    pub async fn orders_for_buyer(&self, call: InboundCall) -> Envelope {
        let store = Arc::clone(&self.store);
        guarded(&self.gate, call, |scope| async move {
            let Some(identity) = scope.identity() else {
                return Envelope::unauthorized("Missing credential");
            };
            let orders = store.by_buyer(&identity.id);
            if orders.is_empty() {
                Envelope::not_found("No orders found!")
            } else {
                Envelope::ok(&orders, "Successfully retrieved orders")
            }
        })
        .await
    }

    /// Cancel an owned order.
    pub async fn cancel_order(&self, call: InboundCall, id: &str) -> Envelope {
        let store = Arc::clone(&self.store);
        let id = id.to_string();
        guarded(&self.gate, call, |scope| async move {
            let Some(identity) = scope.identity() else {
                return Envelope::unauthorized("Missing credential");
            };
            let Some(order) = store.get(&id) else {
                return Envelope::not_found("Order not found!");
            };
            if order.buyer_id != identity.id {
                return Envelope::forbidden("You're not authorized to perform this action.");
            }
            if order.status == OrderStatus::Cancelled {
                return Envelope::bad_request("Order is already cancelled");
            }

            let cancelled = store.cancel(&id).unwrap_or(order);
            Envelope::ok(&cancelled, "Order cancelled successfully")
        })
        .await
    }
}

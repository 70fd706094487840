//! Outbound calls the order service issues to the catalog.
//!
//! Both calls tolerate 404: "no products found" comes back as an empty
//! list and the service decides what that means for the flow at hand. Any
//! other error envelope aborts and is surfaced to the caller.

use serde_json::Value;
use shared_rpc::{decode_list, RequestGateway};
use shared_types::channels::{adjust_stock_route, get_products_route};
use shared_types::{Envelope, Product, StockAdjustment};
use std::sync::Arc;

/// Gateway wrapper for the catalog service.
pub struct CatalogClient {
    gateway: Arc<RequestGateway>,
}

impl CatalogClient {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Batch product lookup by ids.
    pub async fn get_products(&self, product_ids: &[String]) -> Result<Vec<Product>, Envelope> {
        let payload = serde_json::to_value(product_ids).unwrap_or(Value::Null);
        let response = self
            .gateway
            .call(&get_products_route(), payload, None)
            .await;
        Self::decode_products(response)
    }

    /// Ask the catalog to decrement stock.
    pub async fn adjust_quantities(
        &self,
        adjustment: &StockAdjustment,
    ) -> Result<Vec<Product>, Envelope> {
        let payload = serde_json::to_value(adjustment).unwrap_or(Value::Null);
        let response = self
            .gateway
            .call(&adjust_stock_route(), payload, None)
            .await;
        Self::decode_products(response)
    }

    fn decode_products(response: Envelope) -> Result<Vec<Product>, Envelope> {
        if response.is_error() && !response.is_not_found() {
            return Err(response.propagate());
        }
        decode_list::<Product>(response.data.as_ref())
            .map_err(|e| Envelope::bad_request(e.to_string()))
    }
}

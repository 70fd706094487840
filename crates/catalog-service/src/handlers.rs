//! Inbound bus handlers for requests other services send the catalog.
//!
//! Each handler decodes its expected payload shape explicitly and answers
//! with an envelope; a payload that does not decode is a bad request, not
//! a dropped message.

use crate::store::ProductStore;
use async_trait::async_trait;
use serde_json::Value;
use shared_rpc::{decode_item, decode_list, RequestHandler};
use shared_types::{Envelope, Product, StockAdjustment};
use std::sync::Arc;

/// Answers `get-product-request`: single lookup by id.
pub struct GetProductHandler {
    store: Arc<ProductStore>,
}

impl GetProductHandler {
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for GetProductHandler {
    async fn handle(&self, payload: Value) -> Envelope {
        let id = match decode_item::<String>(Some(&payload)) {
            Ok(Some(id)) => id,
            Ok(None) => return Envelope::bad_request("missing product id"),
            Err(e) => return Envelope::bad_request(e.to_string()),
        };

        match self.store.get(&id) {
            Some(product) => Envelope::ok(&product, "Successfully retrieved product"),
            None => Envelope::not_found("Product not found!"),
        }
    }
}

/// Answers `get-products-request`: batch lookup by ids.
pub struct GetProductsHandler {
    store: Arc<ProductStore>,
}

impl GetProductsHandler {
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for GetProductsHandler {
    async fn handle(&self, payload: Value) -> Envelope {
        let ids = match decode_list::<String>(Some(&payload)) {
            Ok(ids) => ids,
            Err(e) => return Envelope::bad_request(e.to_string()),
        };

        let products: Vec<Product> = self.store.get_many(&ids);
        if products.is_empty() {
            Envelope::not_found("Product not found!")
        } else {
            Envelope::ok(&products, "Successfully retrieved products")
        }
    }
}

/// Answers `adjust-stock-request`: stock decrements keyed by product id.
pub struct AdjustStockHandler {
    store: Arc<ProductStore>,
}

impl AdjustStockHandler {
    pub fn new(store: Arc<ProductStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for AdjustStockHandler {
    async fn handle(&self, payload: Value) -> Envelope {
        let adjustment = match decode_item::<StockAdjustment>(Some(&payload)) {
            Ok(Some(adjustment)) => adjustment,
            Ok(None) => return Envelope::bad_request("missing stock adjustment"),
            Err(e) => return Envelope::bad_request(e.to_string()),
        };

        let updated = self.store.adjust_quantities(&adjustment);
        Envelope::ok(&updated, "Product quantities updated successfully")
    }
}

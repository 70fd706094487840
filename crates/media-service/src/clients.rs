//! Outbound calls the media service issues to the catalog.

use serde_json::json;
use shared_rpc::RequestGateway;
use shared_types::channels::get_product_route;
use shared_types::Envelope;
use std::sync::Arc;

/// Gateway wrapper for catalog lookups.
pub struct CatalogClient {
    gateway: Arc<RequestGateway>,
}

impl CatalogClient {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch one product by id; the caller decodes and inspects the result.
    pub async fn get_product(&self, product_id: &str) -> Envelope {
        self.gateway
            .call(&get_product_route(), json!(product_id), None)
            .await
    }
}

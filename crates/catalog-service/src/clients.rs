//! Outbound calls the catalog issues to other services.

use serde_json::Value;
use shared_rpc::RequestGateway;
use shared_types::channels::delete_media_route;
use shared_types::Envelope;
use std::sync::Arc;

/// Gateway wrapper for the media service.
pub struct MediaClient {
    gateway: Arc<RequestGateway>,
}

impl MediaClient {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Ask the media service to delete all media for the given products.
    ///
    /// "No media found" (404) is nothing to do, not a failure - the
    /// surrounding delete flow continues. Any other error envelope aborts
    /// the cascade and is surfaced to the caller.
    pub async fn delete_for_products(&self, product_ids: &[String]) -> Result<(), Envelope> {
        let payload = serde_json::to_value(product_ids).unwrap_or(Value::Null);
        let response = self
            .gateway
            .call(&delete_media_route(), payload, None)
            .await;

        if response.is_error() && !response.is_not_found() {
            return Err(response.propagate());
        }
        Ok(())
    }
}

//! Inbound bus handlers for the media service.

use crate::store::MediaStore;
use async_trait::async_trait;
use serde_json::Value;
use shared_rpc::{decode_list, RequestHandler};
use shared_types::Envelope;
use std::sync::Arc;
use tracing::info;

/// Answers `delete-media-for-products`: bulk deletion by product ids.
pub struct DeleteMediaHandler {
    store: Arc<MediaStore>,
}

impl DeleteMediaHandler {
    pub fn new(store: Arc<MediaStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler for DeleteMediaHandler {
    async fn handle(&self, payload: Value) -> Envelope {
        let product_ids = match decode_list::<String>(Some(&payload)) {
            Ok(ids) => ids,
            Err(e) => return Envelope::bad_request(e.to_string()),
        };

        let removed = self.store.remove_for_products(&product_ids);
        if removed == 0 {
            return Envelope::not_found("No media found for the given products");
        }

        info!(removed, "Deleted media for products");
        Envelope::ok(&removed, "Media deleted successfully")
    }
}

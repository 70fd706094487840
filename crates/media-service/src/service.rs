//! Media operations.
//!
//! Uploads verify product ownership through a catalog lookup over the bus:
//! only the product's seller may attach media to it.

use crate::clients::CatalogClient;
use crate::store::MediaStore;
use shared_rpc::{decode_item, guarded, AccessGate, InboundCall};
use shared_types::{Envelope, Media, Product};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// The media service facade.
pub struct MediaService {
    store: Arc<MediaStore>,
    catalog: CatalogClient,
    gate: AccessGate,
}

impl MediaService {
    pub fn new(store: Arc<MediaStore>, catalog: CatalogClient, gate: AccessGate) -> Self {
        Self {
            store,
            catalog,
            gate,
        }
    }

    /// List media for a product.
    pub async fn media_for_product(&self, call: InboundCall, product_id: &str) -> Envelope {
        let store = Arc::clone(&self.store);
        let product_id = product_id.to_string();
        guarded(&self.gate, call, |_scope| async move {
            let media = store.for_product(&product_id);
            if media.is_empty() {
                Envelope::not_found("No media found for this product")
            } else {
                Envelope::ok(&media, "Successfully retrieved media")
            }
        })
        .await
    }

    /// Attach an image to an owned product.
    pub async fn upload(
        &self,
        call: InboundCall,
        product_id: &str,
        image_path: &str,
    ) -> Envelope {
        let store = Arc::clone(&self.store);
        let catalog = &self.catalog;
        let product_id = product_id.to_string();
        let image_path = image_path.to_string();
        guarded(&self.gate, call, |scope| async move {
            let Some(identity) = scope.identity() else {
                return Envelope::unauthorized("Missing credential");
            };

            let response = catalog.get_product(&product_id).await;
            if response.is_error() {
                return response.propagate();
            }
            let product = match decode_item::<Product>(response.data.as_ref()) {
                Ok(Some(product)) => product,
                Ok(None) => return Envelope::not_found("Product not found!"),
                Err(e) => return Envelope::bad_request(e.to_string()),
            };

            if product.seller_id != identity.id {
                return Envelope::forbidden("You cannot perform this operation.");
            }

            let media = store.insert(Media {
                id: Uuid::new_v4().to_string(),
                image_path,
                product_id,
            });
            info!(media = %media.id, product = %media.product_id, "Media uploaded");
            Envelope::created(&media, "Media uploaded successfully")
        })
        .await
    }

    /// Delete all media for the given products. Inter-service surface.
    ///
    /// Answers 404 when nothing matched - the catalog's cascade treats
    /// that as "nothing to do" and continues.
    pub fn delete_for_products(&self, product_ids: &[String]) -> Envelope {
        let removed = self.store.remove_for_products(product_ids);
        if removed == 0 {
            Envelope::not_found("No media found for the given products")
        } else {
            Envelope::ok(&removed, "Media deleted successfully")
        }
    }
}

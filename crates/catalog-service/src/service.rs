//! Catalog operations.
//!
//! Every public operation takes the inbound call and runs behind the
//! access gate; reads are exempt by policy, mutations require a validated
//! seller. Ownership checks compare the resolved identity against the
//! product's seller.

use crate::clients::MediaClient;
use crate::store::ProductStore;
use serde::{Deserialize, Serialize};
use shared_rpc::{guarded, AccessGate, CallScope, InboundCall};
use shared_types::envelope::status;
use shared_types::{AvailabilityRequest, Envelope, Identity, Product, StockAdjustment};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Fields a seller supplies when listing a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: u32,
}

impl CreateProduct {
    fn into_product(self, seller_id: &str) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            seller_id: seller_id.to_string(),
            active: true,
        }
    }
}

/// Partial update applied to an owned product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
    pub active: Option<bool>,
}

impl UpdateProduct {
    fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(active) = self.active {
            product.active = active;
        }
    }
}

/// The catalog service facade.
pub struct CatalogService {
    store: Arc<ProductStore>,
    media: MediaClient,
    gate: AccessGate,
}

impl CatalogService {
    pub fn new(store: Arc<ProductStore>, media: MediaClient, gate: AccessGate) -> Self {
        Self { store, media, gate }
    }

    /// Look up one product.
    pub async fn get_product(&self, call: InboundCall, id: &str) -> Envelope {
        let store = Arc::clone(&self.store);
        let id = id.to_string();
        guarded(&self.gate, call, |_scope| async move {
            match store.get(&id) {
                Some(product) => Envelope::ok(&product, "Successfully retrieved product"),
                None => Envelope::not_found("Product not found!"),
            }
        })
        .await
    }

    /// List every product.
    pub async fn list_products(&self, call: InboundCall) -> Envelope {
        let store = Arc::clone(&self.store);
        guarded(&self.gate, call, |_scope| async move {
            let all = store.all();
            if all.is_empty() {
                Envelope::not_found("No products found!")
            } else {
                Envelope::ok(&all, "Successfully retrieved products")
            }
        })
        .await
    }

    /// List one seller's products.
    pub async fn products_by_seller(&self, call: InboundCall, seller_id: &str) -> Envelope {
        let store = Arc::clone(&self.store);
        let seller_id = seller_id.to_string();
        guarded(&self.gate, call, |_scope| async move {
            let products = store.by_seller(&seller_id);
            if products.is_empty() {
                Envelope::not_found("No products found!")
            } else {
                Envelope::ok(&products, "Successfully retrieved products")
            }
        })
        .await
    }

    /// Create a product owned by the calling seller.
    pub async fn create_product(&self, call: InboundCall, dto: CreateProduct) -> Envelope {
        let store = Arc::clone(&self.store);
        guarded(&self.gate, call, |scope| async move {
            let Some(identity) = scope.identity() else {
                return Envelope::unauthorized("Missing credential");
            };
            let product = store.insert(dto.into_product(&identity.id));
            info!(product = %product.id, seller = %identity.id, "Product created");
            Envelope::created(&product, "Product created successfully")
        })
        .await
    }

    /// Update an owned product.
    pub async fn update_product(
        &self,
        call: InboundCall,
        id: &str,
        dto: UpdateProduct,
    ) -> Envelope {
        let store = Arc::clone(&self.store);
        let id = id.to_string();
        guarded(&self.gate, call, |scope| async move {
            let mut product = match authorize_owned(&store, &scope, &id) {
                Ok(product) => product,
                Err(envelope) => return envelope,
            };
            dto.apply(&mut product);
            let updated = store.insert(product);
            Envelope::ok(&updated, "Product updated successfully")
        })
        .await
    }

    /// Delete an owned product, cascading into its media first.
    ///
    /// The sub-calls run to completion one after the other; there is no
    /// distributed transaction. A media failure other than "nothing to
    /// delete" aborts before the product record is touched.
    pub async fn delete_product(&self, call: InboundCall, id: &str) -> Envelope {
        let store = Arc::clone(&self.store);
        let id = id.to_string();
        let media = &self.media;
        guarded(&self.gate, call, |scope| async move {
            let product = match authorize_owned(&store, &scope, &id) {
                Ok(product) => product,
                Err(envelope) => return envelope,
            };

            if let Err(abort) = media.delete_for_products(&[product.id.clone()]).await {
                return abort;
            }

            store.remove(&id);
            info!(product = %id, "Product deleted");
            Envelope::ok(&product, "Product deleted successfully")
        })
        .await
    }

    /// Delete every product of the calling seller, cascading media.
    pub async fn delete_products_by_seller(&self, call: InboundCall) -> Envelope {
        let store = Arc::clone(&self.store);
        let media = &self.media;
        guarded(&self.gate, call, |scope| async move {
            let Some(identity) = scope.identity() else {
                return Envelope::unauthorized("Missing credential");
            };
            let products = store.by_seller(&identity.id);
            if products.is_empty() {
                return Envelope::not_found("No products found!");
            }

            let ids: Vec<String> = products.iter().map(|p| p.id.clone()).collect();
            if let Err(abort) = media.delete_for_products(&ids).await {
                return abort;
            }

            store.remove_many(&ids);
            Envelope::ok(&products, "Products deleted successfully")
        })
        .await
    }

    /// Check whether the requested quantities are in stock.
    ///
    /// Inter-service surface; not gated.
    pub fn check_availability(&self, requests: &[AvailabilityRequest]) -> Envelope {
        let mut available = Vec::new();
        let mut unavailable = Vec::new();

        for request in requests {
            match self.store.get(&request.id) {
                Some(product) if product.quantity >= request.quantity => available.push(product),
                Some(product) => unavailable.push(product),
                None => unavailable.push(Product {
                    id: request.id.clone(),
                    ..Product::default()
                }),
            }
        }

        if unavailable.is_empty() {
            Envelope::ok(&available, "All products are available")
        } else {
            Envelope::build(
                status::BAD_REQUEST,
                "Some products are unavailable",
                serde_json::to_value(&unavailable).ok(),
            )
        }
    }

    /// Batch lookup for other services. Not gated.
    pub fn get_products(&self, ids: &[String]) -> Envelope {
        let products = self.store.get_many(ids);
        if products.is_empty() {
            Envelope::not_found("Product not found!")
        } else {
            Envelope::ok(&products, "Successfully retrieved products")
        }
    }

    /// Apply stock decrements. Not gated.
    pub fn adjust_quantities(&self, adjustment: &StockAdjustment) -> Envelope {
        let updated = self.store.adjust_quantities(adjustment);
        Envelope::ok(&updated, "Product quantities updated successfully")
    }
}

fn authorize_owned(
    store: &ProductStore,
    scope: &CallScope,
    id: &str,
) -> Result<Product, Envelope> {
    let Some(identity) = scope.identity() else {
        return Err(Envelope::unauthorized("Missing credential"));
    };
    let Some(product) = store.get(id) else {
        return Err(Envelope::not_found("Product not found!"));
    };
    if !is_owner(identity, &product) {
        return Err(Envelope::forbidden(
            "You're not authorized to perform this action.",
        ));
    }
    Ok(product)
}

fn is_owner(identity: &Identity, product: &Product) -> bool {
    identity.id == product.seller_id
}

//! # Core Domain Entities
//!
//! The DTOs exchanged between services. Persistence shapes are each
//! service's own concern; these are the cross-service contract only.
//!
//! ## Clusters
//!
//! - **Catalog**: `Product`, `AvailabilityRequest`, `StockAdjustment`
//! - **Media**: `Media`
//! - **Orders**: `Order`, `OrderLine`, `OrderStatus`

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A catalog product as exposed to other services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Product {
    /// Unique product identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Units in stock.
    pub quantity: u32,
    /// The seller who owns this product.
    pub seller_id: String,
    /// Whether the product is visible to buyers.
    pub active: bool,
}

/// A stored media record for a product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Media {
    /// Unique media identifier.
    pub id: String,
    /// Storage path of the image; the file store itself is external.
    pub image_path: String,
    /// The product this media belongs to.
    pub product_id: String,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
    /// Unit price captured at order time.
    pub unit_price: f64,
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Order {
    pub id: String,
    pub buyer_id: String,
    pub lines: Vec<OrderLine>,
    /// Sum over lines of `quantity * unit_price`.
    pub total: f64,
    pub status: OrderStatus,
}

impl Order {
    /// Recompute the order total from its lines.
    #[must_use]
    pub fn computed_total(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| f64::from(line.quantity) * line.unit_price)
            .sum()
    }
}

/// A single product-availability query: is `quantity` of `id` in stock?
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub id: String,
    pub quantity: u32,
}

/// Stock decrements keyed by product id, applied by the catalog service.
pub type StockAdjustment = HashMap<String, u32>;

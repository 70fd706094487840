//! # Catalog Service
//!
//! Owns product records. Reads are open; mutations pass the access gate
//! (seller role required) and ownership checks. Deleting products cascades
//! into the media service over the bus, treating "no media" as nothing to
//! do rather than a failure.
//!
//! Inbound bus surface (answered by [`handlers`]):
//! - `get-product-request` - single product lookup for the media service
//! - `get-products-request` - batch lookup for the order service
//! - `adjust-stock-request` - stock decrements for the order service

pub mod adapter;
pub mod clients;
pub mod handlers;
pub mod service;
pub mod store;

pub use adapter::{connect, spawn_responder};
pub use clients::MediaClient;
pub use service::{CatalogService, CreateProduct, UpdateProduct};
pub use store::ProductStore;

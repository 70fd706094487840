//! # Media Service
//!
//! Owns product image records (paths only; the file store is external).
//! Uploads are gated and ownership-checked through a catalog lookup over
//! the bus. The catalog's cascading delete lands here on
//! `delete-media-for-products`; "no media" answers 404, which the catalog
//! treats as nothing to do.

pub mod adapter;
pub mod clients;
pub mod handlers;
pub mod service;
pub mod store;

pub use adapter::{connect, spawn_responder};
pub use clients::CatalogClient;
pub use service::MediaService;
pub use store::MediaStore;

//! # Order Service
//!
//! Places orders for buyers. Every inbound call is validated - the order
//! gate exempts nothing. Placement composes two catalog calls over the
//! bus: a batch product lookup, then a stock adjustment. The calls run to
//! completion one after the other with no distributed transaction; a
//! failed sub-call surfaces in the returned envelope.

pub mod adapter;
pub mod clients;
pub mod service;
pub mod store;

pub use adapter::connect;
pub use clients::CatalogClient;
pub use service::{OrderItem, OrderService};
pub use store::OrderStore;

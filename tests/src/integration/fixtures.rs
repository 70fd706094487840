//! Shared fixtures: a full platform on one in-memory bus.

use catalog_service::{CatalogService, ProductStore};
use identity_service::{UserDirectory, UserRecord};
use media_service::{MediaService, MediaStore};
use order_service::{OrderService, OrderStore};
use shared_bus::InMemoryBus;
use shared_rpc::RpcConfig;
use shared_types::Role;
use std::sync::Arc;
use std::time::Duration;

/// Every service wired onto one bus, with a seeded seller and buyer.
pub struct Platform {
    pub bus: Arc<InMemoryBus>,
    pub catalog: Arc<CatalogService>,
    pub media: Arc<MediaService>,
    pub orders: Arc<OrderService>,
    pub product_store: Arc<ProductStore>,
    pub media_store: Arc<MediaStore>,
    pub order_store: Arc<OrderStore>,
    pub seller: UserRecord,
    pub buyer: UserRecord,
}

impl Platform {
    pub fn seller_credential(&self) -> String {
        format!("Bearer {}", self.seller.token)
    }

    pub fn buyer_credential(&self) -> String {
        format!("Bearer {}", self.buyer.token)
    }
}

/// Short deadlines so failure paths complete quickly under test.
pub fn test_rpc_config() -> RpcConfig {
    RpcConfig {
        default_timeout: Duration::from_millis(500),
        sweep_interval: Duration::from_millis(100),
    }
}

/// Start the whole platform on a fresh bus.
pub fn start_platform() -> Platform {
    let bus = Arc::new(InMemoryBus::new());
    let config = test_rpc_config();

    let users = Arc::new(UserDirectory::new());
    let seller = users.register(UserRecord::new("Alice", Role::Seller));
    let buyer = users.register(UserRecord::new("Bob", Role::Buyer));
    identity_service::spawn_responder(Arc::clone(&bus), users);

    let product_store = Arc::new(ProductStore::new());
    catalog_service::spawn_responder(Arc::clone(&bus), Arc::clone(&product_store));
    let catalog = catalog_service::connect(Arc::clone(&bus), Arc::clone(&product_store), &config);

    let media_store = Arc::new(MediaStore::new());
    media_service::spawn_responder(Arc::clone(&bus), Arc::clone(&media_store));
    let media = media_service::connect(Arc::clone(&bus), Arc::clone(&media_store), &config);

    let order_store = Arc::new(OrderStore::new());
    let orders = order_service::connect(Arc::clone(&bus), Arc::clone(&order_store), &config);

    Platform {
        bus,
        catalog,
        media,
        orders,
        product_store,
        media_store,
        order_store,
        seller,
        buyer,
    }
}

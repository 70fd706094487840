//! Service wiring: one bus, four services, their responders and gateways.

use crate::config::AgoraConfig;
use catalog_service::{CatalogService, ProductStore};
use identity_service::{UserDirectory, UserRecord};
use media_service::{MediaService, MediaStore};
use order_service::{OrderService, OrderStore};
use shared_bus::InMemoryBus;
use shared_types::Role;
use std::sync::Arc;
use tracing::info;

/// The assembled platform.
pub struct Platform {
    pub bus: Arc<InMemoryBus>,
    pub users: Arc<UserDirectory>,
    pub catalog: Arc<CatalogService>,
    pub media: Arc<MediaService>,
    pub orders: Arc<OrderService>,
    pub product_store: Arc<ProductStore>,
    pub media_store: Arc<MediaStore>,
    pub order_store: Arc<OrderStore>,
}

/// Start every service on one shared bus.
///
/// Responders and reply routers are spawned onto the current runtime;
/// dropping the returned `Platform` shuts the bus down with it.
pub fn start(config: &AgoraConfig) -> Platform {
    let bus = Arc::new(InMemoryBus::with_capacity(config.bus_capacity));

    let users = Arc::new(UserDirectory::new());
    identity_service::spawn_responder(Arc::clone(&bus), Arc::clone(&users));

    let product_store = Arc::new(ProductStore::new());
    catalog_service::spawn_responder(Arc::clone(&bus), Arc::clone(&product_store));
    let catalog = catalog_service::connect(
        Arc::clone(&bus),
        Arc::clone(&product_store),
        &config.rpc,
    );

    let media_store = Arc::new(MediaStore::new());
    media_service::spawn_responder(Arc::clone(&bus), Arc::clone(&media_store));
    let media = media_service::connect(Arc::clone(&bus), Arc::clone(&media_store), &config.rpc);

    let order_store = Arc::new(OrderStore::new());
    let orders = order_service::connect(Arc::clone(&bus), Arc::clone(&order_store), &config.rpc);

    info!("All services wired onto the shared bus");

    Platform {
        bus,
        users,
        catalog,
        media,
        orders,
        product_store,
        media_store,
        order_store,
    }
}

/// Seed demo accounts so the platform is usable out of the box.
pub fn seed_demo_users(platform: &Platform) -> (UserRecord, UserRecord) {
    let seller = platform
        .users
        .register(UserRecord::new("Ada the Seller", Role::Seller));
    let buyer = platform
        .users
        .register(UserRecord::new("Bert the Buyer", Role::Buyer));
    info!(seller = %seller.id, buyer = %buyer.id, "Seeded demo users");
    (seller, buyer)
}

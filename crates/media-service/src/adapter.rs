//! Bus wiring for the media service.

use crate::clients::CatalogClient;
use crate::handlers::DeleteMediaHandler;
use crate::service::MediaService;
use crate::store::MediaStore;
use shared_bus::InMemoryBus;
use shared_rpc::{AccessGate, GatePolicy, Responder, RequestGateway, RpcConfig};
use shared_types::channels::{auth_route, delete_media_route, get_product_route};
use shared_types::ServiceTag;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Build the media service facade: gateway, gate, and catalog client.
///
/// Must be called from within a tokio runtime (spawns the reply router).
pub fn connect(
    bus: Arc<InMemoryBus>,
    store: Arc<MediaStore>,
    config: &RpcConfig,
) -> Arc<MediaService> {
    let gateway = RequestGateway::connect(
        Arc::clone(&bus),
        ServiceTag::Media,
        &[auth_route(ServiceTag::Media), get_product_route()],
        config,
    );

    let gate = AccessGate::new(
        Arc::clone(&gateway),
        auth_route(ServiceTag::Media),
        GatePolicy::reads_exempt_seller_mutations(),
    );
    let catalog = CatalogClient::new(gateway);

    Arc::new(MediaService::new(store, catalog, gate))
}

/// Spawn the responder answering the media service's request channel.
pub fn spawn_responder(bus: Arc<InMemoryBus>, store: Arc<MediaStore>) -> JoinHandle<()> {
    let responder = Responder::new(bus, ServiceTag::Media).bind(
        delete_media_route(),
        Arc::new(DeleteMediaHandler::new(store)),
    );

    tokio::spawn(responder.run())
}

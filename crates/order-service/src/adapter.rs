//! Bus wiring for the order service.

use crate::clients::CatalogClient;
use crate::service::OrderService;
use crate::store::OrderStore;
use shared_bus::InMemoryBus;
use shared_rpc::{AccessGate, GatePolicy, RequestGateway, RpcConfig};
use shared_types::channels::{adjust_stock_route, auth_route, get_products_route};
use shared_types::ServiceTag;
use std::sync::Arc;

/// Build the order service facade: gateway, gate, and catalog client.
///
/// The order gate exempts nothing: every call is validated. Must be called
/// from within a tokio runtime (spawns the reply router).
pub fn connect(
    bus: Arc<InMemoryBus>,
    store: Arc<OrderStore>,
    config: &RpcConfig,
) -> Arc<OrderService> {
    let gateway = RequestGateway::connect(
        Arc::clone(&bus),
        ServiceTag::Orders,
        &[
            auth_route(ServiceTag::Orders),
            get_products_route(),
            adjust_stock_route(),
        ],
        config,
    );

    let gate = AccessGate::new(
        Arc::clone(&gateway),
        auth_route(ServiceTag::Orders),
        GatePolicy::validate_everything(),
    );
    let catalog = CatalogClient::new(gateway);

    Arc::new(OrderService::new(store, catalog, gate))
}

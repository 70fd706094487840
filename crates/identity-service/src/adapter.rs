//! Bus wiring for the identity service.

use crate::directory::UserDirectory;
use crate::handler::CredentialValidationHandler;
use shared_bus::InMemoryBus;
use shared_rpc::Responder;
use shared_types::channels::auth_route;
use shared_types::ServiceTag;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Spawn the credential-validation responder.
///
/// One handler serves all three caller services; each gets its own
/// request/reply pair so replies route back to the right gate.
pub fn spawn_responder(bus: Arc<InMemoryBus>, directory: Arc<UserDirectory>) -> JoinHandle<()> {
    let handler = Arc::new(CredentialValidationHandler::new(directory));

    let responder = Responder::new(bus, ServiceTag::Identity)
        .bind(auth_route(ServiceTag::Catalog), handler.clone())
        .bind(auth_route(ServiceTag::Media), handler.clone())
        .bind(auth_route(ServiceTag::Orders), handler);

    tokio::spawn(responder.run())
}

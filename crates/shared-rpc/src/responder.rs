//! Responder: the callee side of request/reply.
//!
//! Subscribes to request channels, runs the local handler, and publishes
//! the handler's envelope on the matching reply channel with the original
//! correlation id. One handler value may serve several request/reply pairs
//! (the identity service's credential validation answers three caller
//! services this way) - sharing is by `Arc`, not copy-paste.

use async_trait::async_trait;
use serde_json::Value;
use shared_bus::{BusMessage, BusPublisher, ChannelFilter, InMemoryBus};
use shared_types::{ChannelName, Envelope, Route, ServiceTag};
use std::sync::Arc;
use tracing::{debug, warn};

/// The contract a domain handler exposes to the responder.
///
/// Handlers are exception-free from the responder's point of view: every
/// outcome, including failure, is an [`Envelope`]. The handler's envelope
/// is propagated verbatim - status and message included - so the caller
/// sees the true validation or lookup outcome.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle one inbound request payload.
    async fn handle(&self, payload: Value) -> Envelope;
}

/// One request channel answered on one reply channel by one handler.
struct Binding {
    route: Route,
    handler: Arc<dyn RequestHandler>,
}

/// Callee-side dispatcher for a service's request channels.
pub struct Responder {
    bus: Arc<InMemoryBus>,
    /// Tag stamped on every reply, for tracing.
    source: ServiceTag,
    bindings: Vec<Binding>,
}

impl Responder {
    pub fn new(bus: Arc<InMemoryBus>, source: ServiceTag) -> Self {
        Self {
            bus,
            source,
            bindings: Vec::new(),
        }
    }

    /// Bind a handler to a request/reply channel pair.
    #[must_use]
    pub fn bind(mut self, route: Route, handler: Arc<dyn RequestHandler>) -> Self {
        self.bindings.push(Binding { route, handler });
        self
    }

    /// Consume requests until the bus closes.
    ///
    /// The subscription is created before the returned future is first
    /// polled, so requests published right after spawning are not lost.
    /// This should be spawned as a background task.
    pub fn run(self) -> impl std::future::Future<Output = ()> + Send {
        let channels: Vec<ChannelName> = self
            .bindings
            .iter()
            .map(|binding| binding.route.request.clone())
            .collect();
        let mut sub = self.bus.subscribe(ChannelFilter::channels(channels));

        async move {
            while let Some(message) = sub.recv().await {
                let Some(binding) = self
                    .bindings
                    .iter()
                    .find(|binding| binding.route.request == message.channel)
                else {
                    continue;
                };

                debug!(
                    channel = %message.channel,
                    correlation_id = %message.correlation_id,
                    source = %message.source,
                    "Handling request"
                );

                let envelope = binding.handler.handle(message.payload).await;

                // Explicit reply destination wins over the binding's default.
                let reply_channel = message
                    .reply_to
                    .unwrap_or_else(|| binding.route.reply.clone());
                let payload = serde_json::to_value(&envelope).unwrap_or(Value::Null);
                let reply = BusMessage::reply(
                    reply_channel,
                    message.correlation_id,
                    self.source,
                    payload,
                );
                self.bus.publish(reply).await;
            }

            warn!(source = %self.source, "Request stream ended, responder stopping");
        }
    }
}

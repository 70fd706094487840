//! Request gateway: the caller side of request/reply.
//!
//! One publish per call, no automatic retry. The calling task suspends
//! until the reply router resolves its pending call or the deadline
//! elapses; either way the caller sees an [`Envelope`], never a raised
//! transport error.

use crate::config::RpcConfig;
use crate::pending::{expiry_sweep, PendingCallStore};
use futures::StreamExt;
use serde_json::Value;
use shared_bus::{BusMessage, BusPublisher, ChannelFilter, InMemoryBus};
use shared_types::{ChannelName, Envelope, Route, ServiceTag};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Caller-side gateway issuing synchronous-looking calls over the bus.
pub struct RequestGateway {
    /// The underlying transport.
    bus: Arc<InMemoryBus>,
    /// In-flight call registry.
    pending: Arc<PendingCallStore>,
    /// Tag stamped on every outgoing request, for tracing.
    source: ServiceTag,
    /// Deadline applied when the caller passes none.
    default_timeout: Duration,
}

impl RequestGateway {
    pub fn new(
        bus: Arc<InMemoryBus>,
        pending: Arc<PendingCallStore>,
        source: ServiceTag,
        default_timeout: Duration,
    ) -> Self {
        Self {
            bus,
            pending,
            source,
            default_timeout,
        }
    }

    /// Wire up a gateway for a service: builds the pending store, spawns
    /// the reply router over the reply channels of `routes`, and spawns the
    /// backstop expiry sweep.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(
        bus: Arc<InMemoryBus>,
        source: ServiceTag,
        routes: &[Route],
        config: &RpcConfig,
    ) -> Arc<Self> {
        let pending = Arc::new(PendingCallStore::new(config.default_timeout));

        let reply_channels: Vec<ChannelName> =
            routes.iter().map(|route| route.reply.clone()).collect();
        let router = ReplyRouter::new(Arc::clone(&bus), Arc::clone(&pending), reply_channels);
        tokio::spawn(router.run());
        tokio::spawn(expiry_sweep(Arc::clone(&pending), config.sweep_interval));

        Arc::new(Self::new(bus, pending, source, config.default_timeout))
    }

    /// Issue a request on `route` and wait for the correlated reply.
    ///
    /// Publishes exactly once. On timeout the pending entry is removed and
    /// a failure envelope is synthesized; a reply arriving later is dropped
    /// by the store with no observable effect.
    pub async fn call(&self, route: &Route, payload: Value, timeout: Option<Duration>) -> Envelope {
        let timeout = timeout.unwrap_or(self.default_timeout);

        let (correlation_id, rx) = self.pending.register(&route.request, Some(timeout));

        let message = BusMessage::request(
            route.request.clone(),
            correlation_id,
            self.source,
            route.reply.clone(),
            payload,
        );

        let receivers = self.bus.publish(message).await;
        if receivers == 0 {
            // Fire-and-forget transport: nothing to deliver to right now,
            // the call will simply run into its deadline.
            warn!(
                correlation_id = %correlation_id,
                channel = %route.request,
                "No subscribers for request"
            );
        }

        debug!(
            correlation_id = %correlation_id,
            channel = %route.request,
            source = %self.source,
            "Sent request"
        );

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(_)) => {
                // Slot dropped without resolution (expiry sweep won the race)
                Envelope::bad_request(format!(
                    "request on '{}' timed out after {:?}",
                    route.request, timeout
                ))
            }
            Err(_) => {
                self.pending.cancel(&correlation_id);
                Envelope::bad_request(format!(
                    "request on '{}' timed out after {:?}",
                    route.request, timeout
                ))
            }
        }
    }

    /// Number of calls currently in flight.
    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }

    /// The in-flight registry, shared with the reply router.
    pub fn pending(&self) -> &Arc<PendingCallStore> {
        &self.pending
    }
}

/// Background task routing reply messages to their waiting callers.
pub struct ReplyRouter {
    bus: Arc<InMemoryBus>,
    pending: Arc<PendingCallStore>,
    reply_channels: Vec<ChannelName>,
}

impl ReplyRouter {
    pub fn new(
        bus: Arc<InMemoryBus>,
        pending: Arc<PendingCallStore>,
        reply_channels: Vec<ChannelName>,
    ) -> Self {
        Self {
            bus,
            pending,
            reply_channels,
        }
    }

    /// Listen on the reply channels and resolve pending calls.
    ///
    /// The subscription is created before the returned future is first
    /// polled, so replies published right after spawning are not lost.
    /// This should be spawned as a background task. A malformed reply
    /// payload resolves the call with a decode-failure envelope so the
    /// caller still unblocks with the one failure vocabulary.
    pub fn run(self) -> impl std::future::Future<Output = ()> + Send {
        let filter = ChannelFilter::channels(self.reply_channels.clone());
        let mut stream = self.bus.message_stream(filter);

        async move {
            while let Some(message) = stream.next().await {
                let envelope = match serde_json::from_value::<Envelope>(message.payload.clone()) {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        warn!(
                            correlation_id = %message.correlation_id,
                            channel = %message.channel,
                            error = %e,
                            "Malformed reply payload"
                        );
                        Envelope::bad_request(format!(
                            "malformed reply on '{}': {e}",
                            message.channel
                        ))
                    }
                };

                if !self.pending.resolve(message.correlation_id, envelope) {
                    debug!(
                        correlation_id = %message.correlation_id,
                        channel = %message.channel,
                        "Dropping late or unknown reply"
                    );
                }
            }

            warn!("Reply stream ended, router stopping");
        }
    }
}

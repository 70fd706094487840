//! # Bus Message
//!
//! The wire unit the bus delivers: a destination channel, correlation and
//! tracing headers, and an opaque interchange-encoded payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::{ChannelName, CorrelationId, ServiceTag};

/// A message addressed to one channel.
///
/// For requests, `reply_to` names the channel the responder must answer on
/// and `correlation_id` is freshly generated. For replies, `reply_to` is
/// absent and `correlation_id` is copied from the originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusMessage {
    /// Destination channel.
    pub channel: ChannelName,
    /// Unique identifier for correlating request/reply pairs.
    pub correlation_id: CorrelationId,
    /// The issuing service, for tracing.
    pub source: ServiceTag,
    /// Routing information for the reply. Present on requests that expect
    /// an answer.
    pub reply_to: Option<ChannelName>,
    /// The actual payload (interchange-encoded).
    pub payload: Value,
}

impl BusMessage {
    /// Build a request message expecting a reply on `reply_to`.
    pub fn request(
        channel: ChannelName,
        correlation_id: CorrelationId,
        source: ServiceTag,
        reply_to: ChannelName,
        payload: Value,
    ) -> Self {
        Self {
            channel,
            correlation_id,
            source,
            reply_to: Some(reply_to),
            payload,
        }
    }

    /// Build a reply message carrying the original correlation id.
    pub fn reply(
        channel: ChannelName,
        correlation_id: CorrelationId,
        source: ServiceTag,
        payload: Value,
    ) -> Self {
        Self {
            channel,
            correlation_id,
            source,
            reply_to: None,
            payload,
        }
    }
}

/// Filter for subscribing to specific channels.
#[derive(Debug, Clone, Default)]
pub struct ChannelFilter {
    /// Channels to include. Empty means all channels.
    pub channels: Vec<ChannelName>,
}

impl ChannelFilter {
    /// A filter that accepts every message.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter for specific channels.
    #[must_use]
    pub fn channels(channels: Vec<ChannelName>) -> Self {
        Self { channels }
    }

    /// A filter for a single channel.
    #[must_use]
    pub fn channel(channel: ChannelName) -> Self {
        Self {
            channels: vec![channel],
        }
    }

    /// Check whether a message matches this filter.
    #[must_use]
    pub fn matches(&self, message: &BusMessage) -> bool {
        self.channels.is_empty() || self.channels.contains(&message.channel)
    }
}

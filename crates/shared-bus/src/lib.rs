//! # Shared Bus - Message Bus for Inter-Service Communication
//!
//! The only transport between services is this asynchronous pub/sub bus:
//! a publisher fires a message at a destination channel and forgets it;
//! subscribers receive every message matching their channel filter.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Service A   │                    │  Service B   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │ Message Bus  │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! The bus itself guarantees nothing beyond delivery to currently
//! subscribed channels: no acknowledgement, no retry, no ordering between
//! independent publishers. The synchronous request/reply discipline lives
//! one layer up, in `shared-rpc`.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod message;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use message::{BusMessage, ChannelFilter};
pub use publisher::{BusPublisher, InMemoryBus};
pub use subscriber::{MessageStream, Subscription, SubscriptionError};

/// Maximum messages to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

//! # Shared RPC - Request/Reply over the Message Bus
//!
//! Gives blocking-call ergonomics to caller code while living entirely on a
//! fire-and-forget transport. Implemented once and shared by every service
//! instead of the four hand-copied variants this layer replaces.
//!
//! ## Flow
//!
//! ```text
//! caller task                 bus                    responder task
//!     │  register ─┐           │                          │
//!     │            ▼           │                          │
//!     │      PendingCallStore  │                          │
//!     │  publish(request) ───▶ │ ───▶ handler(payload)    │
//!     │  await slot / timeout  │ ◀─── publish(reply) ◀────┘
//!     │            ▲           │
//!     │    ReplyRouter resolve ┘
//!     ▼
//!  Envelope (always - timeouts and decode failures are envelopes too)
//! ```
//!
//! ## Pieces
//!
//! - [`PendingCallStore`]: concurrency-safe registry of in-flight calls,
//!   exactly-once resolution under reply/expiry races.
//! - [`RequestGateway`]: issues one publish per call and suspends the
//!   calling task until the reply arrives or the deadline elapses.
//! - [`ReplyRouter`]: background task routing reply messages back to their
//!   waiting callers by correlation id.
//! - [`Responder`]: callee-side dispatch - one handler may serve several
//!   request/reply channel pairs.
//! - [`coerce`]: target-type-driven decoding of opaque envelope payloads.
//! - [`AccessGate`]: inbound interceptor that validates credentials through
//!   one gateway call before the protected handler runs.

pub mod coerce;
pub mod config;
pub mod gate;
pub mod gateway;
pub mod pending;
pub mod responder;

// Re-export main types
pub use coerce::{decode_item, decode_list, CoerceError};
pub use config::RpcConfig;
pub use gate::{guarded, AccessGate, CallKind, CallScope, GatePolicy, InboundCall};
pub use gateway::{ReplyRouter, RequestGateway};
pub use pending::{expiry_sweep, PendingCallStore, PendingStats};
pub use responder::{Responder, RequestHandler};

// The correlation id is defined with the shared types; re-exported here
// because this crate is where it is minted and tracked.
pub use shared_types::CorrelationId;

//! # Response Envelope
//!
//! The uniform result shape every cross-service call produces.
//!
//! ## Contract
//!
//! - Wire shape is `{status, message, data}`; `data` may be absent, a single
//!   record, or an ordered sequence of records.
//! - Error-ness is DERIVED: a status of 400 or above denotes failure. The
//!   flag is never transmitted.
//! - Error and non-error envelopes flow through the same type so call sites
//!   have one failure vocabulary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP-style status codes used across the platform.
pub mod status {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
}

/// The uniform result wrapper for every remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// HTTP-style status code.
    pub status: u16,
    /// Human-readable outcome description.
    pub message: String,
    /// Opaque payload: absent, a single record, or an ordered sequence.
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Build an envelope from raw parts.
    pub fn build(status: u16, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }

    /// Successful envelope carrying a serialized record.
    ///
    /// Values that cannot be represented in the interchange encoding
    /// degrade to an empty payload rather than a panic.
    pub fn ok<T: Serialize>(data: &T, message: impl Into<String>) -> Self {
        Self::build(status::OK, message, serde_json::to_value(data).ok())
    }

    /// Successful envelope with no payload.
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self::build(status::OK, message, None)
    }

    /// Resource-created envelope carrying the new record.
    pub fn created<T: Serialize>(data: &T, message: impl Into<String>) -> Self {
        Self::build(status::CREATED, message, serde_json::to_value(data).ok())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::build(status::BAD_REQUEST, message, None)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::build(status::UNAUTHORIZED, message, None)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::build(status::FORBIDDEN, message, None)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::build(status::NOT_FOUND, message, None)
    }

    /// True iff the status denotes a client or server error class.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// True for the not-found class, which cascading operations treat as
    /// "nothing to do" rather than a fatal failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == status::NOT_FOUND
    }

    /// Carry a failure over to a new envelope, dropping the payload.
    ///
    /// Used when a composite operation aborts on an upstream error and must
    /// surface the original status and message to its own caller.
    #[must_use]
    pub fn propagate(&self) -> Self {
        Self::build(self.status, self.message.clone(), None)
    }
}

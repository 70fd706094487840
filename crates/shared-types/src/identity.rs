//! # Caller Identity
//!
//! The resolved principal of one inbound call. An `Identity` is produced by
//! the identity service, attached to a single call's scope by the access
//! gate, and dropped when that call completes. It is never persisted and
//! never shared across calls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform roles. Only sellers may mutate catalog and media entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Buyer,
    Seller,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Buyer => write!(f, "BUYER"),
            Role::Seller => write!(f, "SELLER"),
        }
    }
}

/// The caller's resolved principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Granted role.
    pub role: Role,
}

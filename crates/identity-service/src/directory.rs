//! In-memory user directory.
//!
//! Persistence is an external concern; this store holds the records the
//! credential handler resolves against.

use dashmap::DashMap;
use shared_types::{Identity, Role};
use uuid::Uuid;

/// One registered user with their active bearer token.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// The opaque bearer token this user presents as credential.
    pub token: String,
}

impl UserRecord {
    /// Create a record with a fresh id and token.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            role,
            token: Uuid::new_v4().to_string(),
        }
    }
}

/// Token-indexed user store.
pub struct UserDirectory {
    by_token: DashMap<String, UserRecord>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_token: DashMap::new(),
        }
    }

    /// Register a user, returning their record.
    pub fn register(&self, record: UserRecord) -> UserRecord {
        self.by_token.insert(record.token.clone(), record.clone());
        record
    }

    /// Resolve a bearer token to the caller's identity.
    #[must_use]
    pub fn resolve_token(&self, token: &str) -> Option<Identity> {
        self.by_token.get(token).map(|record| Identity {
            id: record.id.clone(),
            name: record.name.clone(),
            role: record.role,
        })
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

//! Credential validation handler.
//!
//! The payload is the raw authorization header as forwarded by the calling
//! service's gate. Serialized headers sometimes arrive with surrounding
//! quotes; they are stripped before the scheme check.

use crate::directory::UserDirectory;
use async_trait::async_trait;
use serde_json::Value;
use shared_rpc::{decode_item, RequestHandler};
use shared_types::Envelope;
use std::sync::Arc;
use tracing::{info, warn};

const BEARER_PREFIX: &str = "Bearer ";

/// Validates a raw credential and returns the caller's identity.
pub struct CredentialValidationHandler {
    directory: Arc<UserDirectory>,
}

impl CredentialValidationHandler {
    pub fn new(directory: Arc<UserDirectory>) -> Self {
        Self { directory }
    }

    fn strip_header(raw: &str) -> &str {
        let trimmed = raw.trim();
        if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
            trimmed[1..trimmed.len() - 1].trim()
        } else {
            trimmed
        }
    }
}

#[async_trait]
impl RequestHandler for CredentialValidationHandler {
    async fn handle(&self, payload: Value) -> Envelope {
        let Ok(Some(raw)) = decode_item::<String>(Some(&payload)) else {
            warn!("Validation request without credential payload");
            return Envelope::unauthorized("Missing authorization header");
        };

        let header = Self::strip_header(&raw);
        let Some(token) = header.strip_prefix(BEARER_PREFIX) else {
            return Envelope::unauthorized("Malformed authorization header");
        };

        match self.directory.resolve_token(token.trim()) {
            Some(identity) => {
                info!(user = %identity.id, role = %identity.role, "Credential accepted");
                Envelope::ok(&identity, "Credential accepted")
            }
            None => {
                warn!("Credential rejected: unknown token");
                Envelope::unauthorized("Invalid or expired credential")
            }
        }
    }
}

//! # Identity Service
//!
//! Owns the user directory and answers credential-validation requests from
//! the other services. One [`CredentialValidationHandler`] serves catalog,
//! media, and orders through three distinct request/reply channel pairs so
//! each caller's replies route back to it.
//!
//! The handler's envelope is propagated to callers verbatim: an invalid
//! credential reaches the calling service as 401, and the gates on the far
//! side rely on that status to short-circuit.

pub mod adapter;
pub mod directory;
pub mod handler;

pub use adapter::spawn_responder;
pub use directory::{UserDirectory, UserRecord};
pub use handler::CredentialValidationHandler;

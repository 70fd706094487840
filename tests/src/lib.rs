//! # Agora Test Suite
//!
//! Cross-service integration tests: every flow here runs the real services
//! against one in-memory bus, with replies routed by correlation id.

pub mod integration;

//! RPC layer configuration.

use std::time::Duration;

/// Tunables for the request/reply layer.
///
/// All timeouts and intervals have sane defaults with override capability.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Deadline applied to a call when the caller passes none.
    pub default_timeout: Duration,
    /// How often the backstop sweep removes abandoned pending calls.
    pub sweep_interval: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(5),
        }
    }
}

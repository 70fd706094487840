//! # Platform Configuration
//!
//! Unified configuration for the bus and the RPC layer. All values have
//! sane defaults with environment override capability.

use shared_rpc::RpcConfig;
use std::time::Duration;

/// Complete platform configuration.
#[derive(Debug, Clone)]
pub struct AgoraConfig {
    /// Messages buffered per bus subscriber before backpressure.
    pub bus_capacity: usize,
    /// Request/reply tunables shared by every service.
    pub rpc: RpcConfig,
}

impl Default for AgoraConfig {
    fn default() -> Self {
        Self {
            bus_capacity: shared_bus::DEFAULT_CHANNEL_CAPACITY,
            rpc: RpcConfig::default(),
        }
    }
}

impl AgoraConfig {
    /// Defaults overridden from the environment.
    ///
    /// - `AGORA_RPC_TIMEOUT_SECS`: call deadline in seconds
    /// - `AGORA_BUS_CAPACITY`: per-subscriber buffer size
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_parse::<u64>("AGORA_RPC_TIMEOUT_SECS") {
            config.rpc.default_timeout = Duration::from_secs(secs);
        }
        if let Some(capacity) = env_parse::<usize>("AGORA_BUS_CAPACITY") {
            config.bus_capacity = capacity;
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|raw| raw.parse().ok())
}

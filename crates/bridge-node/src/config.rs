//! # Node Configuration
//!
//! Unified configuration for the bridge runtime, loaded from an optional
//! TOML file with environment overrides.
//!
//! A missing file means defaults; a file that exists but does not parse is
//! fatal — the process must terminate before any connection is made.

use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Complete bridge configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Gateway HTTP configuration.
    pub gateway: GatewayConfig,
    /// Ledger node configuration.
    pub ledger: LedgerConfig,
    /// Bus configuration.
    pub bus: BusConfig,
}

/// Gateway HTTP configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listen address for the callback and RPC endpoints.
    pub listen_addr: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8176".to_string(),
        }
    }
}

/// Ledger node configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// RPC URL of the ledger node.
    pub rpc_url: String,
    /// Bounded wait on forwarded RPC calls, in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:7076".to_string(),
            rpc_timeout_secs: 30,
        }
    }
}

/// Bus configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Per-subscriber channel capacity.
    pub channel_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: bridge_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Errors from configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// The file exists but is not valid TOML.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl BridgeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// A present-but-unparseable file is an error; the caller must treat it
    /// as fatal before opening any connection.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Apply environment overrides.
    pub fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("BRIDGE_LISTEN_ADDR") {
            self.gateway.listen_addr = addr;
        }
        if let Ok(url) = std::env::var("BRIDGE_LEDGER_RPC_URL") {
            self.ledger.rpc_url = url;
        }
    }
}

//! # Dashboard Configuration & Constants
//!
//! Every address and network parameter the dashboard depends on lives here.
//! The defaults target the Polygon Amoy testnet, where the factory contract
//! is deployed. Point the dashboard somewhere else by loading a JSON config
//! file or by overriding fields from the CLI.

use std::path::Path;

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Chain id of the Polygon Amoy testnet.
pub const AMOY_CHAIN_ID: u64 = 80_002;

/// Display name used when asking the wallet to add the network.
pub const AMOY_CHAIN_NAME: &str = "Amoy Testnet";

/// Public JSON-RPC endpoint for Amoy.
pub const AMOY_RPC_URL: &str = "https://rpc-amoy.polygon.technology";

/// Block explorer for Amoy.
pub const AMOY_EXPLORER_URL: &str = "https://amoy.polygonscan.com/";

/// Native gas currency on Amoy.
pub const AMOY_NATIVE_SYMBOL: &str = "POL";

/// Decimals of the native gas currency. Every EVM chain uses 18.
pub const NATIVE_DECIMALS: u8 = 18;

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// The deployed `VaultFactory` on Amoy.
pub const VAULT_FACTORY_ADDRESS: Address = address!("C5Bb65728B18E53AD4E5d7f39ca37Bf3BEf48951");

// ---------------------------------------------------------------------------
// Controller Tunables
// ---------------------------------------------------------------------------

/// Finished transactions kept in the dashboard history.
pub const TX_HISTORY_LIMIT: usize = 32;

/// Capacity of the dashboard event broadcast channel. Slow subscribers that
/// fall further behind than this lose events, not the controller.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Placeholder shown in the APY column. The vault contracts do not expose
/// a yield figure.
pub const APY_UNAVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating a [`DashboardConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that was being parsed.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A field holds a value the dashboard cannot work with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Network Configuration
// ---------------------------------------------------------------------------

/// Native currency descriptor, in the shape wallets expect when a network
/// is added (`wallet_addEthereumChain`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Everything a wallet needs to switch to, or learn about, the target network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Numeric chain id.
    pub chain_id: u64,
    /// Human-readable network name.
    pub chain_name: String,
    /// Gas currency.
    pub native_currency: NativeCurrency,
    /// RPC endpoints, in preference order.
    pub rpc_urls: Vec<String>,
    /// Block explorers, in preference order.
    pub block_explorer_urls: Vec<String>,
}

impl NetworkConfig {
    /// The Polygon Amoy testnet.
    pub fn amoy() -> Self {
        Self {
            chain_id: AMOY_CHAIN_ID,
            chain_name: AMOY_CHAIN_NAME.to_string(),
            native_currency: NativeCurrency {
                name: AMOY_NATIVE_SYMBOL.to_string(),
                symbol: AMOY_NATIVE_SYMBOL.to_string(),
                decimals: NATIVE_DECIMALS,
            },
            rpc_urls: vec![AMOY_RPC_URL.to_string()],
            block_explorer_urls: vec![AMOY_EXPLORER_URL.to_string()],
        }
    }

    /// Chain id as the `0x`-prefixed hex quantity wallets use on the wire.
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }
}

// ---------------------------------------------------------------------------
// Dashboard Configuration
// ---------------------------------------------------------------------------

/// Top-level configuration for a [`crate::DashboardController`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// The network the dashboard insists on.
    pub network: NetworkConfig,
    /// Address of the `VaultFactory` contract on that network.
    pub factory_address: Address,
    /// How many finished transactions to keep in the history.
    pub tx_history_limit: usize,
    /// Capacity of the dashboard event channel.
    pub event_channel_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::amoy(),
            factory_address: VAULT_FACTORY_ADDRESS,
            tx_history_limit: TX_HISTORY_LIMIT,
            event_channel_capacity: EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl DashboardConfig {
    /// Loads and validates a config from a JSON file. Missing fields fall
    /// back to the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that could never produce a working dashboard.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.chain_id == 0 {
            return Err(ConfigError::Invalid("chain id must be non-zero".into()));
        }
        if self.network.rpc_urls.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one RPC URL is required".into(),
            ));
        }
        if self.factory_address == Address::ZERO {
            return Err(ConfigError::Invalid(
                "factory address must not be the zero address".into(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event channel capacity must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// The id of the network the dashboard insists on.
    pub fn target_chain_id(&self) -> u64 {
        self.network.chain_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_targets_amoy() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.target_chain_id(), 80_002);
        assert_eq!(cfg.factory_address, VAULT_FACTORY_ADDRESS);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn chain_id_hex_matches_wallet_format() {
        assert_eq!(NetworkConfig::amoy().chain_id_hex(), "0x13882");
    }

    #[test]
    fn network_config_uses_wallet_field_names() {
        let json = serde_json::to_value(NetworkConfig::amoy()).unwrap();
        assert!(json.get("chainId").is_some());
        assert!(json.get("rpcUrls").is_some());
        assert!(json.get("blockExplorerUrls").is_some());
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
    }

    #[test]
    fn zero_factory_rejected() {
        let cfg = DashboardConfig {
            factory_address: Address::ZERO,
            ..DashboardConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn empty_rpc_urls_rejected() {
        let mut cfg = DashboardConfig::default();
        cfg.network.rpc_urls.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_channel_capacity_rejected() {
        let cfg = DashboardConfig {
            event_channel_capacity: 0,
            ..DashboardConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tx_history_limit": 5 }}"#).unwrap();

        let cfg = DashboardConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.tx_history_limit, 5);
        assert_eq!(cfg.network, NetworkConfig::amoy());
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = DashboardConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = DashboardConfig::from_json_file(Path::new("/nonexistent/yieldvault.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

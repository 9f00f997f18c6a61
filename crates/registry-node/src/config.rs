//! Node configuration from environment variables.

use shared_types::{Epoch, Pubkey};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    /// Registry id is not set (zero value).
    #[error("Registry id is the zero key. Set RR_REGISTRY_ID to a hex-encoded 32-byte key.")]
    MissingRegistryId,

    /// Stake mint is not set (zero value).
    #[error("Stake mint is the zero key. Set RR_STAKE_MINT to a hex-encoded 32-byte key.")]
    MissingStakeMint,
}

/// Runtime configuration for a registry node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Namespace mixed into every slot derivation
    pub registry_id: Pubkey,

    /// Mint of the stake token this node's ledger holds
    pub stake_mint: Pubkey,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,

    /// Optional genesis file with initial balances
    pub genesis_file: Option<PathBuf>,

    /// Epoch the ledger clock starts at
    pub initial_epoch: Epoch,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            registry_id: Pubkey::ZERO,
            stake_mint: Pubkey::ZERO,
            log_level: "info".to_string(),
            json_logs: false,
            genesis_file: None,
            initial_epoch: 0,
        }
    }
}

impl NodeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RR_REGISTRY_ID`: Registry namespace, hex (required)
    /// - `RR_STAKE_MINT`: Stake token mint, hex (required)
    /// - `RR_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `RR_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `RR_GENESIS_FILE`: Path to a genesis JSON file (default: none)
    /// - `RR_INITIAL_EPOCH`: Starting epoch (default: 0)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`NodeConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let key = |var: &'static str, default: Pubkey| -> Result<Pubkey, ConfigError> {
            match lookup(var) {
                Some(value) => value.trim().parse().map_err(|e| ConfigError::InvalidValue {
                    var,
                    reason: format!("{}", e),
                }),
                None => Ok(default),
            }
        };

        Ok(Self {
            registry_id: key("RR_REGISTRY_ID", defaults.registry_id)?,

            stake_mint: key("RR_STAKE_MINT", defaults.stake_mint)?,

            log_level: lookup("RR_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("RR_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(defaults.json_logs),

            genesis_file: lookup("RR_GENESIS_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),

            initial_epoch: match lookup("RR_INITIAL_EPOCH") {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|e| ConfigError::InvalidValue {
                        var: "RR_INITIAL_EPOCH",
                        reason: format!("{}", e),
                    })?,
                None => defaults.initial_epoch,
            },
        })
    }

    /// Reject configurations that cannot run a ledger.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry_id.is_zero() {
            return Err(ConfigError::MissingRegistryId);
        }
        if self.stake_mint.is_zero() {
            return Err(ConfigError::MissingStakeMint);
        }
        Ok(())
    }
}

//! # Genesis
//!
//! Initial stake-token balances and the starting epoch, loaded from JSON:
//!
//! ```json
//! {
//!   "epoch": 100,
//!   "balances": [
//!     { "account": "a1a1...a1", "amount": 10000 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use shared_types::{Epoch, Pubkey, TokenAmount};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Genesis loading errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("Failed to read genesis file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse genesis file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid genesis configuration.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisBalance {
    pub account: Pubkey,
    pub amount: TokenAmount,
}

/// Genesis configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Overrides the configured initial epoch when present.
    #[serde(default)]
    pub epoch: Option<Epoch>,

    #[serde(default)]
    pub balances: Vec<GenesisBalance>,
}

impl GenesisConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GenesisError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, GenesisError> {
        let genesis: Self = serde_json::from_str(raw)?;
        genesis.validate()?;
        Ok(genesis)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), GenesisError> {
        let mut seen = HashSet::new();
        for balance in &self.balances {
            if !seen.insert(balance.account) {
                return Err(GenesisError::InvalidConfig(format!(
                    "account {} listed twice",
                    balance.account.short()
                )));
            }
        }
        let total = self
            .balances
            .iter()
            .try_fold(0u64, |acc, b| acc.checked_add(b.amount));
        if total.is_none() {
            return Err(GenesisError::InvalidConfig(
                "total supply overflows".to_string(),
            ));
        }
        Ok(())
    }

    /// Sum of all balances, saturating; `validate` rejects an overflow.
    pub fn total_supply(&self) -> TokenAmount {
        self.balances
            .iter()
            .fold(0, |total: TokenAmount, b| total.saturating_add(b.amount))
    }
}

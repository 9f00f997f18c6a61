//! Registry configuration.

use crate::domain::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use shared_types::{Epoch, Pubkey};

/// Shortest cooldown a community may configure.
pub const DEFAULT_MIN_COOLDOWN_EPOCHS: Epoch = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Namespace mixed into every slot derivation.
    pub registry_id: Pubkey,
    /// Lower bound for `CommunityConfig::cooldown_epochs`.
    pub min_cooldown_epochs: Epoch,
}

impl RegistryConfig {
    pub fn new(registry_id: Pubkey) -> Self {
        Self {
            registry_id,
            min_cooldown_epochs: DEFAULT_MIN_COOLDOWN_EPOCHS,
        }
    }

    pub fn validate(&self) -> RegistryResult<()> {
        if self.registry_id.is_zero() {
            return Err(RegistryError::InvalidConfiguration(
                "registry id must not be zero".to_string(),
            ));
        }
        if self.min_cooldown_epochs == 0 {
            return Err(RegistryError::InvalidConfiguration(
                "minimum cooldown must be at least one epoch".to_string(),
            ));
        }
        Ok(())
    }
}

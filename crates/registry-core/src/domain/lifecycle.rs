//! # Reporter Lifecycle
//!
//! ```text
//! [Inactive] ──activate──→ [Active] ──deactivate──→ [Unstaking{unlock}] ──release──→ [Inactive]
//! ```
//!
//! Transitions consume the current status and return the next one; any other
//! edge fails with `InvalidReporterStatus`. There is no way to jump states.

use super::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use shared_types::Epoch;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReporterStatus {
    /// Not staked; may activate
    #[default]
    Inactive,
    /// Staked; may report
    Active,
    /// Requested unstaking; stake releasable from `unlock_epoch`
    Unstaking { unlock_epoch: Epoch },
}

impl ReporterStatus {
    pub fn activate(self) -> RegistryResult<Self> {
        match self {
            ReporterStatus::Inactive => Ok(ReporterStatus::Active),
            other => Err(other.invalid()),
        }
    }

    pub fn deactivate(self, current_epoch: Epoch, cooldown_epochs: Epoch) -> RegistryResult<Self> {
        match self {
            ReporterStatus::Active => {
                let unlock_epoch = current_epoch
                    .checked_add(cooldown_epochs)
                    .ok_or(RegistryError::ArithmeticOverflow)?;
                Ok(ReporterStatus::Unstaking { unlock_epoch })
            }
            other => Err(other.invalid()),
        }
    }

    pub fn release(self, current_epoch: Epoch) -> RegistryResult<Self> {
        match self {
            ReporterStatus::Unstaking { unlock_epoch } if current_epoch >= unlock_epoch => {
                Ok(ReporterStatus::Inactive)
            }
            ReporterStatus::Unstaking { unlock_epoch } => Err(RegistryError::ReleaseEpochInFuture {
                unlock_epoch,
                current_epoch,
            }),
            other => Err(other.invalid()),
        }
    }

    pub fn is_active(self) -> bool {
        self == ReporterStatus::Active
    }

    pub fn unlock_epoch(self) -> Option<Epoch> {
        match self {
            ReporterStatus::Unstaking { unlock_epoch } => Some(unlock_epoch),
            _ => None,
        }
    }

    /// Persisted tag byte.
    pub fn tag(self) -> u8 {
        match self {
            ReporterStatus::Inactive => 0,
            ReporterStatus::Active => 1,
            ReporterStatus::Unstaking { .. } => 2,
        }
    }

    /// Rebuild from the persisted tag and unlock epoch.
    pub fn from_parts(tag: u8, unlock_epoch: Epoch) -> Option<Self> {
        match (tag, unlock_epoch) {
            (0, 0) => Some(ReporterStatus::Inactive),
            (1, 0) => Some(ReporterStatus::Active),
            (2, unlock_epoch) => Some(ReporterStatus::Unstaking { unlock_epoch }),
            _ => None,
        }
    }

    fn invalid(self) -> RegistryError {
        RegistryError::InvalidReporterStatus { status: self }
    }
}

impl fmt::Display for ReporterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReporterStatus::Inactive => f.write_str("Inactive"),
            ReporterStatus::Active => f.write_str("Active"),
            ReporterStatus::Unstaking { unlock_epoch } => {
                write!(f, "Unstaking(unlock_epoch={})", unlock_epoch)
            }
        }
    }
}

//! # Authorization Guard
//!
//! Stateless policy consulted before every guarded mutation. Checks run in a
//! fixed order and the first failure wins:
//!
//! 1. signer == reporter principal
//! 2. reporter.community == target community
//! 3. reporter not frozen
//! 4. reporter status == Active
//! 5. community permission matrix grants the reporter's role the action
//!
//! On success the guard hands out an [`Authorized`] token. Write paths take
//! the token by value, so nothing can be applied before the check completed.

use super::{Action, Community, RegistryError, Reporter, ReporterRole, ReporterStatus, SlotAddress};
use shared_types::Pubkey;
use thiserror::Error;
use tracing::{trace, warn};

/// Reason a guard check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("signer is not the reporter principal")]
    SignerMismatch,

    #[error("signer is not the community authority")]
    AuthorityMismatch,

    #[error("reporter belongs to another community")]
    CommunityMismatch,

    #[error("reporter is frozen")]
    Frozen,

    #[error("reporter is {0}, not Active")]
    NotActive(ReporterStatus),

    #[error("role {role:?} may not {action}")]
    RoleNotPermitted { role: ReporterRole, action: Action },

    #[error("only the case owner or an Authority may modify the case")]
    NotCaseOwner,

    #[error("the creator of a record cannot confirm it")]
    CreatorCannotConfirm,
}

impl From<Denial> for RegistryError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::CommunityMismatch => RegistryError::CommunityMismatch,
            Denial::Frozen => RegistryError::FrozenReporter,
            Denial::NotActive(status) => RegistryError::InvalidReporterStatus { status },
            other => RegistryError::Unauthorized(other),
        }
    }
}

/// Proof that a reporter passed the guard for one action.
#[derive(Debug)]
pub struct Authorized {
    action: Action,
    reporter: SlotAddress,
}

impl Authorized {
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn reporter(&self) -> SlotAddress {
        self.reporter
    }
}

pub struct AuthorizationGuard;

impl AuthorizationGuard {
    /// Authorize `signer`, acting through `reporter`, to perform `action`
    /// inside `community`.
    pub fn authorize(
        signer: &Pubkey,
        reporter_slot: SlotAddress,
        reporter: &Reporter,
        community_slot: SlotAddress,
        community: &Community,
        action: Action,
    ) -> Result<Authorized, Denial> {
        let verdict = Self::check(signer, reporter, community_slot, community, action);
        match &verdict {
            Ok(()) => trace!(%action, reporter = %reporter_slot.short(), "authorized"),
            Err(denial) => warn!(%action, reporter = %reporter_slot.short(), %denial, "denied"),
        }
        verdict.map(|()| Authorized {
            action,
            reporter: reporter_slot,
        })
    }

    fn check(
        signer: &Pubkey,
        reporter: &Reporter,
        community_slot: SlotAddress,
        community: &Community,
        action: Action,
    ) -> Result<(), Denial> {
        Self::check_reporter_signer(signer, reporter, community_slot)?;
        if !reporter.status().is_active() {
            return Err(Denial::NotActive(reporter.status()));
        }
        if !community.config.permissions.permits(reporter.role, action) {
            return Err(Denial::RoleNotPermitted {
                role: reporter.role,
                action,
            });
        }
        Ok(())
    }

    /// Rules 1-3 only: used by the reporter's own lifecycle operations, which
    /// are valid outside the Active state.
    pub fn check_reporter_signer(
        signer: &Pubkey,
        reporter: &Reporter,
        community_slot: SlotAddress,
    ) -> Result<(), Denial> {
        if reporter.principal != *signer {
            return Err(Denial::SignerMismatch);
        }
        if reporter.community != community_slot {
            return Err(Denial::CommunityMismatch);
        }
        if reporter.is_frozen {
            return Err(Denial::Frozen);
        }
        Ok(())
    }

    /// Community administration is reserved to the community authority.
    pub fn check_authority(signer: &Pubkey, community: &Community) -> Result<(), Denial> {
        if community.authority != *signer {
            warn!(signer = %signer.short(), "authority check failed");
            return Err(Denial::AuthorityMismatch);
        }
        Ok(())
    }
}

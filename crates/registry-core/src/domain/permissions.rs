//! # Role Permission Matrix
//!
//! One role bitmask per guarded action, stored on the community so the
//! authority can tune policy without touching call sites.
//!
//! | Action | Default roles |
//! |--------|---------------|
//! | CreateCase, UpdateCase | Full, Authority |
//! | CreateAddress, CreateAsset | Tracer, Full, Authority |
//! | UpdateAddress, UpdateAsset | Authority |
//! | ConfirmAddress, ConfirmAsset | Validator, Full, Authority |

use super::ReporterRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporter action subject to role gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    CreateCase = 0,
    UpdateCase = 1,
    CreateAddress = 2,
    UpdateAddress = 3,
    ConfirmAddress = 4,
    CreateAsset = 5,
    UpdateAsset = 6,
    ConfirmAsset = 7,
}

impl Action {
    pub const COUNT: usize = 8;

    pub const ALL: [Action; Action::COUNT] = [
        Action::CreateCase,
        Action::UpdateCase,
        Action::CreateAddress,
        Action::UpdateAddress,
        Action::ConfirmAddress,
        Action::CreateAsset,
        Action::UpdateAsset,
        Action::ConfirmAsset,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMatrix {
    grants: [u8; Action::COUNT],
}

impl PermissionMatrix {
    /// Matrix that grants nothing.
    pub fn empty() -> Self {
        Self {
            grants: [0; Action::COUNT],
        }
    }

    pub fn from_bytes(grants: [u8; Action::COUNT]) -> Self {
        Self { grants }
    }

    pub fn to_bytes(self) -> [u8; Action::COUNT] {
        self.grants
    }

    pub fn permits(&self, role: ReporterRole, action: Action) -> bool {
        self.grants[action as usize] & role.bit() != 0
    }

    pub fn grant(mut self, action: Action, roles: &[ReporterRole]) -> Self {
        for role in roles {
            self.grants[action as usize] |= role.bit();
        }
        self
    }

    pub fn revoke(mut self, action: Action, roles: &[ReporterRole]) -> Self {
        for role in roles {
            self.grants[action as usize] &= !role.bit();
        }
        self
    }

    /// Roles allowed to perform `action`.
    pub fn roles_for(&self, action: Action) -> Vec<ReporterRole> {
        ReporterRole::ALL
            .into_iter()
            .filter(|role| self.permits(*role, action))
            .collect()
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        use ReporterRole::*;
        Self::empty()
            .grant(Action::CreateCase, &[Full, Authority])
            .grant(Action::UpdateCase, &[Full, Authority])
            .grant(Action::CreateAddress, &[Tracer, Full, Authority])
            .grant(Action::CreateAsset, &[Tracer, Full, Authority])
            .grant(Action::UpdateAddress, &[Authority])
            .grant(Action::UpdateAsset, &[Authority])
            .grant(Action::ConfirmAddress, &[Validator, Full, Authority])
            .grant(Action::ConfirmAsset, &[Validator, Full, Authority])
    }
}

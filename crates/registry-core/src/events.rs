//! # Registry Events
//!
//! Published after a transaction commits, one per successful operation.
//! Failed operations publish nothing.

use crate::domain::{
    CaseId, CaseStatus, Category, CommunityConfig, FixedName, ReporterRole, RewardConfig,
    SlotAddress,
};
use serde::{Deserialize, Serialize};
use shared_types::{Epoch, Pubkey, TokenAmount};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegistryEvent {
    CommunityInitialized {
        community: SlotAddress,
        authority: Pubkey,
        stake_custody: Pubkey,
    },
    CommunityUpdated {
        community: SlotAddress,
        config: CommunityConfig,
    },
    CommunityAuthorityChanged {
        community: SlotAddress,
        previous: Pubkey,
        authority: Pubkey,
    },
    NetworkCreated {
        community: SlotAddress,
        network: SlotAddress,
        name: FixedName,
    },
    NetworkUpdated {
        network: SlotAddress,
        rewards: RewardConfig,
    },
    ReporterCreated {
        community: SlotAddress,
        reporter: SlotAddress,
        principal: Pubkey,
        role: ReporterRole,
    },
    ReporterUpdated {
        reporter: SlotAddress,
        name: FixedName,
        role: ReporterRole,
    },
    ReporterActivated {
        reporter: SlotAddress,
        stake: TokenAmount,
    },
    ReporterDeactivated {
        reporter: SlotAddress,
        unlock_epoch: Epoch,
    },
    ReporterReleased {
        reporter: SlotAddress,
        stake: TokenAmount,
    },
    ReporterFrozen {
        reporter: SlotAddress,
    },
    ReporterUnfrozen {
        reporter: SlotAddress,
    },
    CaseCreated {
        community: SlotAddress,
        case: SlotAddress,
        case_id: CaseId,
        reporter: SlotAddress,
    },
    CaseUpdated {
        case: SlotAddress,
        status: CaseStatus,
        name: FixedName,
    },
    AddressCreated {
        network: SlotAddress,
        address: SlotAddress,
        case_id: CaseId,
        category: Category,
        risk: u8,
    },
    AddressUpdated {
        address: SlotAddress,
        category: Category,
        risk: u8,
    },
    AddressConfirmed {
        address: SlotAddress,
        reporter: SlotAddress,
        confirmations: u8,
        threshold_reached: bool,
    },
    AssetCreated {
        network: SlotAddress,
        asset: SlotAddress,
        case_id: CaseId,
        category: Category,
        risk: u8,
    },
    AssetUpdated {
        asset: SlotAddress,
        category: Category,
        risk: u8,
    },
    AssetConfirmed {
        asset: SlotAddress,
        reporter: SlotAddress,
        confirmations: u8,
        threshold_reached: bool,
    },
}

impl RegistryEvent {
    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            RegistryEvent::CommunityInitialized { .. } => "CommunityInitialized",
            RegistryEvent::CommunityUpdated { .. } => "CommunityUpdated",
            RegistryEvent::CommunityAuthorityChanged { .. } => "CommunityAuthorityChanged",
            RegistryEvent::NetworkCreated { .. } => "NetworkCreated",
            RegistryEvent::NetworkUpdated { .. } => "NetworkUpdated",
            RegistryEvent::ReporterCreated { .. } => "ReporterCreated",
            RegistryEvent::ReporterUpdated { .. } => "ReporterUpdated",
            RegistryEvent::ReporterActivated { .. } => "ReporterActivated",
            RegistryEvent::ReporterDeactivated { .. } => "ReporterDeactivated",
            RegistryEvent::ReporterReleased { .. } => "ReporterReleased",
            RegistryEvent::ReporterFrozen { .. } => "ReporterFrozen",
            RegistryEvent::ReporterUnfrozen { .. } => "ReporterUnfrozen",
            RegistryEvent::CaseCreated { .. } => "CaseCreated",
            RegistryEvent::CaseUpdated { .. } => "CaseUpdated",
            RegistryEvent::AddressCreated { .. } => "AddressCreated",
            RegistryEvent::AddressUpdated { .. } => "AddressUpdated",
            RegistryEvent::AddressConfirmed { .. } => "AddressConfirmed",
            RegistryEvent::AssetCreated { .. } => "AssetCreated",
            RegistryEvent::AssetUpdated { .. } => "AssetUpdated",
            RegistryEvent::AssetConfirmed { .. } => "AssetConfirmed",
        }
    }
}

//! # Instructions
//!
//! Wire form of every registry operation. Each instruction names the slots
//! it touches: the target slot (with the nonce the client derived) and the
//! parent slots the guard checks against.

use crate::domain::{
    AssetId, CaseId, CaseStatus, Category, ChainAddress, CommunityConfig, FixedName, ReporterRole,
    RewardConfig, SlotRef,
};
use serde::{Deserialize, Serialize};
use shared_types::Pubkey;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeCommunity {
    pub community: SlotRef,
    pub id: Pubkey,
    pub stake_mint: Pubkey,
    pub config: CommunityConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCommunity {
    pub community: SlotRef,
    pub config: CommunityConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCommunityAuthority {
    pub community: SlotRef,
    pub new_authority: Pubkey,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNetwork {
    pub community: SlotRef,
    pub network: SlotRef,
    pub name: FixedName,
    pub rewards: RewardConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNetwork {
    pub community: SlotRef,
    pub network: SlotRef,
    pub rewards: RewardConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReporter {
    pub community: SlotRef,
    pub reporter: SlotRef,
    pub principal: Pubkey,
    pub name: FixedName,
    pub role: ReporterRole,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReporter {
    pub community: SlotRef,
    pub reporter: SlotRef,
    pub name: FixedName,
    pub role: ReporterRole,
}

/// A reporter inside its community; used by the lifecycle and freeze
/// operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterAccounts {
    pub community: SlotRef,
    pub reporter: SlotRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCase {
    pub community: SlotRef,
    pub reporter: SlotRef,
    pub case: SlotRef,
    pub case_id: CaseId,
    pub name: FixedName,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCase {
    pub community: SlotRef,
    pub reporter: SlotRef,
    pub case: SlotRef,
    #[serde(default)]
    pub name: Option<FixedName>,
    #[serde(default)]
    pub status: Option<CaseStatus>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAddress {
    pub community: SlotRef,
    pub network: SlotRef,
    pub case: SlotRef,
    pub reporter: SlotRef,
    pub address: SlotRef,
    pub key: ChainAddress,
    pub category: Category,
    pub risk: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAsset {
    pub community: SlotRef,
    pub network: SlotRef,
    pub case: SlotRef,
    pub reporter: SlotRef,
    pub asset: SlotRef,
    pub mint: Pubkey,
    pub asset_id: AssetId,
    pub category: Category,
    pub risk: u8,
}

/// Reclassify an existing address or asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntity {
    pub community: SlotRef,
    pub reporter: SlotRef,
    pub target: SlotRef,
    pub category: Category,
    pub risk: u8,
}

/// Confirm an existing address or asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmEntity {
    pub community: SlotRef,
    pub reporter: SlotRef,
    pub target: SlotRef,
    pub confirmation: SlotRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    InitializeCommunity(InitializeCommunity),
    UpdateCommunity(UpdateCommunity),
    SetCommunityAuthority(SetCommunityAuthority),
    CreateNetwork(CreateNetwork),
    UpdateNetwork(UpdateNetwork),
    CreateReporter(CreateReporter),
    UpdateReporter(UpdateReporter),
    FreezeReporter(ReporterAccounts),
    UnfreezeReporter(ReporterAccounts),
    ActivateReporter(ReporterAccounts),
    DeactivateReporter(ReporterAccounts),
    ReleaseReporter(ReporterAccounts),
    CreateCase(CreateCase),
    UpdateCase(UpdateCase),
    CreateAddress(CreateAddress),
    UpdateAddress(UpdateEntity),
    ConfirmAddress(ConfirmEntity),
    CreateAsset(CreateAsset),
    UpdateAsset(UpdateEntity),
    ConfirmAsset(ConfirmEntity),
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::InitializeCommunity(_) => "initialize_community",
            Instruction::UpdateCommunity(_) => "update_community",
            Instruction::SetCommunityAuthority(_) => "set_community_authority",
            Instruction::CreateNetwork(_) => "create_network",
            Instruction::UpdateNetwork(_) => "update_network",
            Instruction::CreateReporter(_) => "create_reporter",
            Instruction::UpdateReporter(_) => "update_reporter",
            Instruction::FreezeReporter(_) => "freeze_reporter",
            Instruction::UnfreezeReporter(_) => "unfreeze_reporter",
            Instruction::ActivateReporter(_) => "activate_reporter",
            Instruction::DeactivateReporter(_) => "deactivate_reporter",
            Instruction::ReleaseReporter(_) => "release_reporter",
            Instruction::CreateCase(_) => "create_case",
            Instruction::UpdateCase(_) => "update_case",
            Instruction::CreateAddress(_) => "create_address",
            Instruction::UpdateAddress(_) => "update_address",
            Instruction::ConfirmAddress(_) => "confirm_address",
            Instruction::CreateAsset(_) => "create_asset",
            Instruction::UpdateAsset(_) => "update_asset",
            Instruction::ConfirmAsset(_) => "confirm_asset",
        }
    }
}

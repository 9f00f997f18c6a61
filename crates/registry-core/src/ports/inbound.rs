//! # Driving Ports (API - Inbound)
//!
//! Public API of the registry core. Every mutating method takes the
//! transaction signer and either applies completely or returns an error
//! with nothing changed.

use crate::domain::{
    AddressRecord, AssetRecord, Case, Community, Network, RegistryResult, Reporter, SlotAddress,
    SlotRef,
};
use crate::instruction::{
    ConfirmEntity, CreateAddress, CreateAsset, CreateCase, CreateNetwork, CreateReporter,
    InitializeCommunity, ReporterAccounts, SetCommunityAuthority, UpdateCase, UpdateCommunity,
    UpdateEntity, UpdateNetwork, UpdateReporter,
};
use shared_types::Pubkey;

pub trait RegistryApi: Send + Sync {
    // === Community ===

    /// Create a community owned by `signer` and open its custody account.
    fn initialize_community(
        &self,
        signer: &Pubkey,
        args: InitializeCommunity,
    ) -> RegistryResult<Community>;

    fn update_community(&self, signer: &Pubkey, args: UpdateCommunity) -> RegistryResult<Community>;

    fn set_community_authority(
        &self,
        signer: &Pubkey,
        args: SetCommunityAuthority,
    ) -> RegistryResult<Community>;

    // === Network ===

    fn create_network(&self, signer: &Pubkey, args: CreateNetwork) -> RegistryResult<Network>;

    fn update_network(&self, signer: &Pubkey, args: UpdateNetwork) -> RegistryResult<Network>;

    // === Reporter ===

    fn create_reporter(&self, signer: &Pubkey, args: CreateReporter) -> RegistryResult<Reporter>;

    fn update_reporter(&self, signer: &Pubkey, args: UpdateReporter) -> RegistryResult<Reporter>;

    fn freeze_reporter(&self, signer: &Pubkey, args: ReporterAccounts) -> RegistryResult<Reporter>;

    fn unfreeze_reporter(&self, signer: &Pubkey, args: ReporterAccounts)
        -> RegistryResult<Reporter>;

    /// Lock the role's stake in custody and move Inactive → Active.
    fn activate_reporter(&self, signer: &Pubkey, args: ReporterAccounts)
        -> RegistryResult<Reporter>;

    /// Active → Unstaking; the stake stays locked until the cooldown ends.
    fn deactivate_reporter(
        &self,
        signer: &Pubkey,
        args: ReporterAccounts,
    ) -> RegistryResult<Reporter>;

    /// Unstaking → Inactive once unlocked; returns the stake to the principal.
    fn release_reporter(&self, signer: &Pubkey, args: ReporterAccounts) -> RegistryResult<Reporter>;

    // === Case ===

    fn create_case(&self, signer: &Pubkey, args: CreateCase) -> RegistryResult<Case>;

    fn update_case(&self, signer: &Pubkey, args: UpdateCase) -> RegistryResult<Case>;

    // === Address ===

    fn create_address(&self, signer: &Pubkey, args: CreateAddress)
        -> RegistryResult<AddressRecord>;

    fn update_address(&self, signer: &Pubkey, args: UpdateEntity)
        -> RegistryResult<AddressRecord>;

    fn confirm_address(
        &self,
        signer: &Pubkey,
        args: ConfirmEntity,
    ) -> RegistryResult<AddressRecord>;

    // === Asset ===

    fn create_asset(&self, signer: &Pubkey, args: CreateAsset) -> RegistryResult<AssetRecord>;

    fn update_asset(&self, signer: &Pubkey, args: UpdateEntity) -> RegistryResult<AssetRecord>;

    fn confirm_asset(&self, signer: &Pubkey, args: ConfirmEntity) -> RegistryResult<AssetRecord>;

    // === Reads ===

    fn community(&self, slot: &SlotRef) -> RegistryResult<Community>;

    fn network(&self, slot: &SlotRef) -> RegistryResult<Network>;

    fn reporter(&self, slot: &SlotRef) -> RegistryResult<Reporter>;

    fn case(&self, slot: &SlotRef) -> RegistryResult<Case>;

    fn address(&self, slot: &SlotRef) -> RegistryResult<AddressRecord>;

    fn asset(&self, slot: &SlotRef) -> RegistryResult<AssetRecord>;

    /// Raw persisted bytes at `slot`.
    fn record_bytes(&self, slot: &SlotAddress) -> RegistryResult<Option<Vec<u8>>>;
}

//! Registry Service - transaction orchestration
//!
//! Every mutating operation runs as one transaction under the service-wide
//! transaction lock:
//!
//! 1. load and verify every referenced slot
//! 2. run the authorization guard
//! 3. validate inputs and compute the new records
//! 4. move tokens (if any), then commit the write batch
//! 5. publish the event
//!
//! Any error before step 4 leaves state untouched. If the commit fails after
//! a token movement, the movement is reversed.

mod case;
mod community;
mod entity;
mod network;
mod reporter;


use crate::config::RegistryConfig;
use crate::domain::{
    AddressRecord, AssetRecord, Authorized, Case, Community, Network, Record, RecordKey,
    RegistryError, RegistryResult, Reporter, SlotAddress, SlotDeriver, SlotRef,
};
use crate::events::RegistryEvent;
use crate::instruction::{
    ConfirmEntity, CreateAddress, CreateAsset, CreateCase, CreateNetwork, CreateReporter,
    InitializeCommunity, Instruction, ReporterAccounts, SetCommunityAuthority, UpdateCase,
    UpdateCommunity, UpdateEntity, UpdateNetwork, UpdateReporter,
};
use crate::ports::{
    EpochClock, EventPublisher, RecordStore, RegistryApi, StakeToken, TokenError, WriteBatch,
};
use parking_lot::Mutex;
use shared_types::{Pubkey, TokenAmount};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Dependencies for RegistryService
pub struct RegistryDependencies<S, T, C, E> {
    pub store: Arc<S>,
    pub token: Arc<T>,
    pub clock: Arc<C>,
    pub events: Arc<E>,
    pub config: RegistryConfig,
}

pub struct RegistryService<S, T, C, E>
where
    S: RecordStore,
    T: StakeToken,
    C: EpochClock,
    E: EventPublisher,
{
    store: Arc<S>,
    token: Arc<T>,
    clock: Arc<C>,
    events: Arc<E>,
    config: RegistryConfig,
    deriver: SlotDeriver,
    tx_lock: Mutex<()>,
}

/// Result of one committed transaction.
pub(crate) struct Applied<V> {
    pub value: V,
    pub event: RegistryEvent,
}

/// Token movement performed just before the commit.
pub(crate) struct Transfer {
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: TokenAmount,
}

impl<S, T, C, E> RegistryService<S, T, C, E>
where
    S: RecordStore,
    T: StakeToken,
    C: EpochClock,
    E: EventPublisher,
{
    pub fn new(deps: RegistryDependencies<S, T, C, E>) -> RegistryResult<Self> {
        deps.config.validate()?;
        info!(registry = %deps.config.registry_id, "registry service ready");
        Ok(Self {
            deriver: SlotDeriver::new(deps.config.registry_id),
            store: deps.store,
            token: deps.token,
            clock: deps.clock,
            events: deps.events,
            config: deps.config,
            tx_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn deriver(&self) -> &SlotDeriver {
        &self.deriver
    }

    /// Canonical slot of a logical key.
    pub fn slot_for(&self, key: &RecordKey) -> RegistryResult<SlotRef> {
        key.derive(&self.deriver)
    }

    /// Run one instruction and return the events it produced.
    pub fn execute(
        &self,
        signer: &Pubkey,
        instruction: Instruction,
    ) -> RegistryResult<Vec<RegistryEvent>> {
        let name = instruction.name();
        let result = match instruction {
            Instruction::InitializeCommunity(args) => {
                event(self.run_initialize_community(signer, args))
            }
            Instruction::UpdateCommunity(args) => event(self.run_update_community(signer, args)),
            Instruction::SetCommunityAuthority(args) => {
                event(self.run_set_community_authority(signer, args))
            }
            Instruction::CreateNetwork(args) => event(self.run_create_network(signer, args)),
            Instruction::UpdateNetwork(args) => event(self.run_update_network(signer, args)),
            Instruction::CreateReporter(args) => event(self.run_create_reporter(signer, args)),
            Instruction::UpdateReporter(args) => event(self.run_update_reporter(signer, args)),
            Instruction::FreezeReporter(args) => event(self.run_set_frozen(signer, args, true)),
            Instruction::UnfreezeReporter(args) => event(self.run_set_frozen(signer, args, false)),
            Instruction::ActivateReporter(args) => event(self.run_activate_reporter(signer, args)),
            Instruction::DeactivateReporter(args) => {
                event(self.run_deactivate_reporter(signer, args))
            }
            Instruction::ReleaseReporter(args) => event(self.run_release_reporter(signer, args)),
            Instruction::CreateCase(args) => event(self.run_create_case(signer, args)),
            Instruction::UpdateCase(args) => event(self.run_update_case(signer, args)),
            Instruction::CreateAddress(args) => event(self.run_create_address(signer, args)),
            Instruction::UpdateAddress(args) => event(self.run_update_address(signer, args)),
            Instruction::ConfirmAddress(args) => event(self.run_confirm_address(signer, args)),
            Instruction::CreateAsset(args) => event(self.run_create_asset(signer, args)),
            Instruction::UpdateAsset(args) => event(self.run_update_asset(signer, args)),
            Instruction::ConfirmAsset(args) => event(self.run_confirm_asset(signer, args)),
        };
        match result {
            Ok(event) => Ok(vec![event]),
            Err(err) => {
                warn!(instruction = name, signer = %signer.short(), error = %err, "instruction rejected");
                Err(err)
            }
        }
    }

    // === TRANSACTION HELPERS ===

    /// Load the record at `slot`, checking kind, nonce and derivation.
    pub(crate) fn load<R: Record>(&self, slot: &SlotRef) -> RegistryResult<R> {
        let not_owned = || RegistryError::Ownership {
            slot: slot.address,
            expected: R::KIND,
        };
        let stored = self.store.get(&slot.address)?.ok_or_else(not_owned)?;
        if stored.nonce != slot.nonce || stored.key.kind() != R::KIND {
            debug!(slot = %slot.address.short(), nonce = slot.nonce, "slot reference rejected");
            return Err(not_owned());
        }
        stored.key.verify(&self.deriver, slot)?;
        R::decode(&slot.address, &stored.data)
    }

    /// Check that `slot` is the canonical, still-empty slot for `key`.
    pub(crate) fn claim(&self, key: &RecordKey, slot: &SlotRef) -> RegistryResult<()> {
        key.verify(&self.deriver, slot)?;
        if self.store.get(&slot.address)?.is_some() || self.store.slot_of(key)?.is_some() {
            debug!(slot = %slot.address.short(), kind = ?key.kind(), "slot already initialized");
            return Err(RegistryError::DuplicateInitialization { slot: slot.address });
        }
        Ok(())
    }

    /// Move tokens (if any) and commit `batch`. A failed commit reverses the
    /// token movement.
    pub(crate) fn commit(&self, batch: WriteBatch, transfer: Option<Transfer>) -> RegistryResult<()> {
        if let Some(t) = &transfer {
            self.token
                .transfer(&t.from, &t.to, t.amount)
                .map_err(stake_error)?;
        }
        if let Err(err) = self.store.commit(batch) {
            error!(error = %err, "commit failed");
            if let Some(t) = transfer {
                if let Err(refund) = self.token.transfer(&t.to, &t.from, t.amount) {
                    error!(error = %refund, amount = t.amount, "token refund failed");
                }
            }
            return Err(err);
        }
        Ok(())
    }

    /// Commit a write path the guard has approved.
    pub(crate) fn commit_authorized(&self, auth: Authorized, batch: WriteBatch) -> RegistryResult<()> {
        debug!(action = %auth.action(), reporter = %auth.reporter().short(), ops = batch.len(), "committing");
        self.commit(batch, None)
    }

    pub(crate) fn finish<V>(&self, value: V, event: RegistryEvent) -> RegistryResult<Applied<V>> {
        self.events.publish(event.clone());
        Ok(Applied { value, event })
    }
}

fn event<V>(result: RegistryResult<Applied<V>>) -> RegistryResult<RegistryEvent> {
    result.map(|applied| applied.event)
}

fn value<V>(result: RegistryResult<Applied<V>>) -> RegistryResult<V> {
    result.map(|applied| applied.value)
}

fn stake_error(err: TokenError) -> RegistryError {
    match err {
        TokenError::InsufficientFunds {
            required,
            available,
            ..
        } => RegistryError::InsufficientStake {
            required,
            available,
        },
        other => RegistryError::Token(other.to_string()),
    }
}

impl<S, T, C, E> RegistryApi for RegistryService<S, T, C, E>
where
    S: RecordStore,
    T: StakeToken,
    C: EpochClock,
    E: EventPublisher,
{
    fn initialize_community(
        &self,
        signer: &Pubkey,
        args: InitializeCommunity,
    ) -> RegistryResult<Community> {
        value(self.run_initialize_community(signer, args))
    }

    fn update_community(&self, signer: &Pubkey, args: UpdateCommunity) -> RegistryResult<Community> {
        value(self.run_update_community(signer, args))
    }

    fn set_community_authority(
        &self,
        signer: &Pubkey,
        args: SetCommunityAuthority,
    ) -> RegistryResult<Community> {
        value(self.run_set_community_authority(signer, args))
    }

    fn create_network(&self, signer: &Pubkey, args: CreateNetwork) -> RegistryResult<Network> {
        value(self.run_create_network(signer, args))
    }

    fn update_network(&self, signer: &Pubkey, args: UpdateNetwork) -> RegistryResult<Network> {
        value(self.run_update_network(signer, args))
    }

    fn create_reporter(&self, signer: &Pubkey, args: CreateReporter) -> RegistryResult<Reporter> {
        value(self.run_create_reporter(signer, args))
    }

    fn update_reporter(&self, signer: &Pubkey, args: UpdateReporter) -> RegistryResult<Reporter> {
        value(self.run_update_reporter(signer, args))
    }

    fn freeze_reporter(&self, signer: &Pubkey, args: ReporterAccounts) -> RegistryResult<Reporter> {
        value(self.run_set_frozen(signer, args, true))
    }

    fn unfreeze_reporter(
        &self,
        signer: &Pubkey,
        args: ReporterAccounts,
    ) -> RegistryResult<Reporter> {
        value(self.run_set_frozen(signer, args, false))
    }

    fn activate_reporter(
        &self,
        signer: &Pubkey,
        args: ReporterAccounts,
    ) -> RegistryResult<Reporter> {
        value(self.run_activate_reporter(signer, args))
    }

    fn deactivate_reporter(
        &self,
        signer: &Pubkey,
        args: ReporterAccounts,
    ) -> RegistryResult<Reporter> {
        value(self.run_deactivate_reporter(signer, args))
    }

    fn release_reporter(&self, signer: &Pubkey, args: ReporterAccounts) -> RegistryResult<Reporter> {
        value(self.run_release_reporter(signer, args))
    }

    fn create_case(&self, signer: &Pubkey, args: CreateCase) -> RegistryResult<Case> {
        value(self.run_create_case(signer, args))
    }

    fn update_case(&self, signer: &Pubkey, args: UpdateCase) -> RegistryResult<Case> {
        value(self.run_update_case(signer, args))
    }

    fn create_address(
        &self,
        signer: &Pubkey,
        args: CreateAddress,
    ) -> RegistryResult<AddressRecord> {
        value(self.run_create_address(signer, args))
    }

    fn update_address(
        &self,
        signer: &Pubkey,
        args: UpdateEntity,
    ) -> RegistryResult<AddressRecord> {
        value(self.run_update_address(signer, args))
    }

    fn confirm_address(
        &self,
        signer: &Pubkey,
        args: ConfirmEntity,
    ) -> RegistryResult<AddressRecord> {
        value(self.run_confirm_address(signer, args))
    }

    fn create_asset(&self, signer: &Pubkey, args: CreateAsset) -> RegistryResult<AssetRecord> {
        value(self.run_create_asset(signer, args))
    }

    fn update_asset(&self, signer: &Pubkey, args: UpdateEntity) -> RegistryResult<AssetRecord> {
        value(self.run_update_asset(signer, args))
    }

    fn confirm_asset(&self, signer: &Pubkey, args: ConfirmEntity) -> RegistryResult<AssetRecord> {
        value(self.run_confirm_asset(signer, args))
    }

    fn community(&self, slot: &SlotRef) -> RegistryResult<Community> {
        self.load(slot)
    }

    fn network(&self, slot: &SlotRef) -> RegistryResult<Network> {
        self.load(slot)
    }

    fn reporter(&self, slot: &SlotRef) -> RegistryResult<Reporter> {
        self.load(slot)
    }

    fn case(&self, slot: &SlotRef) -> RegistryResult<Case> {
        self.load(slot)
    }

    fn address(&self, slot: &SlotRef) -> RegistryResult<AddressRecord> {
        self.load(slot)
    }

    fn asset(&self, slot: &SlotRef) -> RegistryResult<AssetRecord> {
        self.load(slot)
    }

    fn record_bytes(&self, slot: &SlotAddress) -> RegistryResult<Option<Vec<u8>>> {
        Ok(self.store.get(slot)?.map(|stored| stored.data))
    }
}

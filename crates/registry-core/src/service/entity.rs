//! Address and asset registries.
//!
//! Both record kinds share the same create / reclassify / confirm flow; the
//! [`Classified`] trait abstracts the fields that flow touches.

use super::{Applied, RegistryService};
use crate::domain::{
    bump_confirmations, Action, AddressRecord, AssetRecord, AuthorizationGuard, Authorized, Case,
    CaseStatus, Category, Community, Confirmation, Denial, Network, Record, RecordKey,
    RegistryError, RegistryResult, Reporter, RiskScore, SlotAddress, SlotRef,
};
use crate::events::RegistryEvent;
use crate::instruction::{ConfirmEntity, CreateAddress, CreateAsset, UpdateEntity};
use crate::ports::{EpochClock, EventPublisher, RecordStore, StakeToken, WriteBatch};
use shared_types::Pubkey;
use tracing::{info, warn};

pub(crate) trait Classified: Record {
    fn community(&self) -> SlotAddress;
    fn creator(&self) -> SlotAddress;
    fn confirmations_mut(&mut self) -> &mut u8;
    fn reclassify(&mut self, category: Category, risk: RiskScore);
}

impl Classified for AddressRecord {
    fn community(&self) -> SlotAddress {
        self.community
    }

    fn creator(&self) -> SlotAddress {
        self.reporter
    }

    fn confirmations_mut(&mut self) -> &mut u8 {
        &mut self.confirmations
    }

    fn reclassify(&mut self, category: Category, risk: RiskScore) {
        self.category = category;
        self.risk = risk;
    }
}

impl Classified for AssetRecord {
    fn community(&self) -> SlotAddress {
        self.community
    }

    fn creator(&self) -> SlotAddress {
        self.reporter
    }

    fn confirmations_mut(&mut self) -> &mut u8 {
        &mut self.confirmations
    }

    fn reclassify(&mut self, category: Category, risk: RiskScore) {
        self.category = category;
        self.risk = risk;
    }
}

/// Everything a create operation resolved before building the record.
struct CreateScope {
    auth: Authorized,
    network: SlotAddress,
    case_id: u64,
    risk: RiskScore,
}

/// Outcome of a confirmation, before the event is built.
struct Confirmed<R> {
    record: R,
    confirmations: u8,
    threshold_reached: bool,
}

impl<S, T, C, E> RegistryService<S, T, C, E>
where
    S: RecordStore,
    T: StakeToken,
    C: EpochClock,
    E: EventPublisher,
{
    pub(crate) fn run_create_address(
        &self,
        signer: &Pubkey,
        args: CreateAddress,
    ) -> RegistryResult<Applied<AddressRecord>> {
        let _tx = self.tx_lock.lock();
        let scope = self.resolve_create(
            signer,
            Action::CreateAddress,
            [&args.community, &args.reporter, &args.network, &args.case],
            args.risk,
        )?;

        let key = RecordKey::Address {
            network: scope.network,
            address: args.key,
        };
        self.claim(&key, &args.address)?;
        let record = AddressRecord {
            community: args.community.address,
            network: scope.network,
            address: args.key,
            nonce: args.address.nonce,
            case_id: scope.case_id,
            reporter: args.reporter.address,
            category: args.category,
            risk: scope.risk,
            confirmations: 0,
        };

        self.commit_authorized(
            scope.auth,
            WriteBatch::new().create(key, args.address, record.encode()),
        )?;
        info!(
            network = %scope.network,
            address = %args.address.address,
            case_id = scope.case_id,
            category = ?args.category,
            risk = args.risk,
            "address created"
        );
        let event = RegistryEvent::AddressCreated {
            network: scope.network,
            address: args.address.address,
            case_id: scope.case_id,
            category: args.category,
            risk: args.risk,
        };
        self.finish(record, event)
    }

    pub(crate) fn run_create_asset(
        &self,
        signer: &Pubkey,
        args: CreateAsset,
    ) -> RegistryResult<Applied<AssetRecord>> {
        let _tx = self.tx_lock.lock();
        let scope = self.resolve_create(
            signer,
            Action::CreateAsset,
            [&args.community, &args.reporter, &args.network, &args.case],
            args.risk,
        )?;

        let key = RecordKey::Asset {
            network: scope.network,
            mint: args.mint,
            asset_id: args.asset_id,
        };
        self.claim(&key, &args.asset)?;
        let record = AssetRecord {
            community: args.community.address,
            network: scope.network,
            mint: args.mint,
            asset_id: args.asset_id,
            nonce: args.asset.nonce,
            case_id: scope.case_id,
            reporter: args.reporter.address,
            category: args.category,
            risk: scope.risk,
            confirmations: 0,
        };

        self.commit_authorized(
            scope.auth,
            WriteBatch::new().create(key, args.asset, record.encode()),
        )?;
        info!(
            network = %scope.network,
            asset = %args.asset.address,
            mint = %args.mint.short(),
            case_id = scope.case_id,
            category = ?args.category,
            risk = args.risk,
            "asset created"
        );
        let event = RegistryEvent::AssetCreated {
            network: scope.network,
            asset: args.asset.address,
            case_id: scope.case_id,
            category: args.category,
            risk: args.risk,
        };
        self.finish(record, event)
    }

    pub(crate) fn run_update_address(
        &self,
        signer: &Pubkey,
        args: UpdateEntity,
    ) -> RegistryResult<Applied<AddressRecord>> {
        let _tx = self.tx_lock.lock();
        let record: AddressRecord = self.reclassify(signer, &args, Action::UpdateAddress)?;
        info!(address = %args.target.address, category = ?args.category, risk = args.risk, "address updated");
        let event = RegistryEvent::AddressUpdated {
            address: args.target.address,
            category: args.category,
            risk: args.risk,
        };
        self.finish(record, event)
    }

    pub(crate) fn run_update_asset(
        &self,
        signer: &Pubkey,
        args: UpdateEntity,
    ) -> RegistryResult<Applied<AssetRecord>> {
        let _tx = self.tx_lock.lock();
        let record: AssetRecord = self.reclassify(signer, &args, Action::UpdateAsset)?;
        info!(asset = %args.target.address, category = ?args.category, risk = args.risk, "asset updated");
        let event = RegistryEvent::AssetUpdated {
            asset: args.target.address,
            category: args.category,
            risk: args.risk,
        };
        self.finish(record, event)
    }

    pub(crate) fn run_confirm_address(
        &self,
        signer: &Pubkey,
        args: ConfirmEntity,
    ) -> RegistryResult<Applied<AddressRecord>> {
        let _tx = self.tx_lock.lock();
        let confirmed = self.confirm::<AddressRecord>(signer, &args, Action::ConfirmAddress)?;
        let event = RegistryEvent::AddressConfirmed {
            address: args.target.address,
            reporter: args.reporter.address,
            confirmations: confirmed.confirmations,
            threshold_reached: confirmed.threshold_reached,
        };
        self.finish(confirmed.record, event)
    }

    pub(crate) fn run_confirm_asset(
        &self,
        signer: &Pubkey,
        args: ConfirmEntity,
    ) -> RegistryResult<Applied<AssetRecord>> {
        let _tx = self.tx_lock.lock();
        let confirmed = self.confirm::<AssetRecord>(signer, &args, Action::ConfirmAsset)?;
        let event = RegistryEvent::AssetConfirmed {
            asset: args.target.address,
            reporter: args.reporter.address,
            confirmations: confirmed.confirmations,
            threshold_reached: confirmed.threshold_reached,
        };
        self.finish(confirmed.record, event)
    }

    /// Guard, then check the network and case belong to the community and the
    /// case is still open. Slots are `[community, reporter, network, case]`.
    fn resolve_create(
        &self,
        signer: &Pubkey,
        action: Action,
        [community_slot, reporter_slot, network_slot, case_slot]: [&SlotRef; 4],
        risk: u8,
    ) -> RegistryResult<CreateScope> {
        let community: Community = self.load(community_slot)?;
        let reporter: Reporter = self.load(reporter_slot)?;
        let auth = AuthorizationGuard::authorize(
            signer,
            reporter_slot.address,
            &reporter,
            community_slot.address,
            &community,
            action,
        )?;

        let network: Network = self.load(network_slot)?;
        if network.community != community_slot.address {
            return Err(RegistryError::NetworkMismatch);
        }
        let case: Case = self.load(case_slot)?;
        if case.community != community_slot.address {
            return Err(RegistryError::CaseMismatch);
        }
        if case.status == CaseStatus::Closed {
            return Err(RegistryError::CaseClosed { case_id: case.id });
        }
        let risk = RiskScore::new(risk)?;

        Ok(CreateScope {
            auth,
            network: network_slot.address,
            case_id: case.id,
            risk,
        })
    }

    fn reclassify<R: Classified>(
        &self,
        signer: &Pubkey,
        args: &UpdateEntity,
        action: Action,
    ) -> RegistryResult<R> {
        let community: Community = self.load(&args.community)?;
        let reporter: Reporter = self.load(&args.reporter)?;
        let auth = AuthorizationGuard::authorize(
            signer,
            args.reporter.address,
            &reporter,
            args.community.address,
            &community,
            action,
        )?;
        let mut record: R = self.load(&args.target)?;
        if record.community() != args.community.address {
            return Err(RegistryError::CommunityMismatch);
        }
        let risk = RiskScore::new(args.risk)?;

        record.reclassify(args.category, risk);
        self.commit_authorized(
            auth,
            WriteBatch::new().update(args.target.address, R::KIND, record.encode()),
        )?;
        Ok(record)
    }

    fn confirm<R: Classified>(
        &self,
        signer: &Pubkey,
        args: &ConfirmEntity,
        action: Action,
    ) -> RegistryResult<Confirmed<R>> {
        let community: Community = self.load(&args.community)?;
        let reporter: Reporter = self.load(&args.reporter)?;
        let auth = AuthorizationGuard::authorize(
            signer,
            args.reporter.address,
            &reporter,
            args.community.address,
            &community,
            action,
        )?;
        let mut record: R = self.load(&args.target)?;
        if record.community() != args.community.address {
            return Err(RegistryError::CommunityMismatch);
        }
        if record.creator() == args.reporter.address {
            warn!(record = %args.target.address, "creator attempted to confirm own record");
            return Err(Denial::CreatorCannotConfirm.into());
        }

        let key = RecordKey::Confirmation {
            record: args.target.address,
            reporter: args.reporter.address,
        };
        self.claim(&key, &args.confirmation)?;
        let confirmation = Confirmation {
            record: args.target.address,
            reporter: args.reporter.address,
            nonce: args.confirmation.nonce,
        };
        let confirmations = bump_confirmations(*record.confirmations_mut())?;
        *record.confirmations_mut() = confirmations;
        // Informational only; no automatic escalation.
        let threshold_reached = u32::from(confirmations) >= community.config.confirmation_threshold;

        let batch = WriteBatch::new()
            .create(key, args.confirmation, confirmation.encode())
            .update(args.target.address, R::KIND, record.encode());
        self.commit_authorized(auth, batch)?;
        info!(
            record = %args.target.address,
            reporter = %args.reporter.address,
            confirmations,
            threshold_reached,
            "record confirmed"
        );
        Ok(Confirmed {
            record,
            confirmations,
            threshold_reached,
        })
    }
}

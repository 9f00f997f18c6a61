use super::{Applied, RegistryService, Transfer};
use crate::domain::{
    AuthorizationGuard, Community, Record, RecordKey, RegistryError, RegistryResult, Reporter,
    ReporterStatus, SlotRef,
};
use crate::events::RegistryEvent;
use crate::instruction::{CreateReporter, ReporterAccounts, UpdateReporter};
use crate::ports::{EpochClock, EventPublisher, RecordStore, StakeToken, WriteBatch};
use shared_types::Pubkey;
use tracing::info;

impl<S, T, C, E> RegistryService<S, T, C, E>
where
    S: RecordStore,
    T: StakeToken,
    C: EpochClock,
    E: EventPublisher,
{
    pub(crate) fn run_create_reporter(
        &self,
        signer: &Pubkey,
        args: CreateReporter,
    ) -> RegistryResult<Applied<Reporter>> {
        let _tx = self.tx_lock.lock();
        let community: Community = self.load(&args.community)?;
        AuthorizationGuard::check_authority(signer, &community)?;

        let key = RecordKey::Reporter {
            community: args.community.address,
            principal: args.principal,
        };
        self.claim(&key, &args.reporter)?;
        let reporter = Reporter::new(
            args.community.address,
            args.reporter.nonce,
            args.principal,
            args.name,
            args.role,
        );

        self.commit(
            WriteBatch::new().create(key, args.reporter, reporter.encode()),
            None,
        )?;
        info!(
            community = %args.community.address,
            reporter = %args.reporter.address,
            principal = %args.principal.short(),
            role = ?args.role,
            "reporter created"
        );
        let event = RegistryEvent::ReporterCreated {
            community: args.community.address,
            reporter: args.reporter.address,
            principal: args.principal,
            role: args.role,
        };
        self.finish(reporter, event)
    }

    pub(crate) fn run_update_reporter(
        &self,
        signer: &Pubkey,
        args: UpdateReporter,
    ) -> RegistryResult<Applied<Reporter>> {
        let _tx = self.tx_lock.lock();
        let mut reporter = self.load_administered(signer, &args.community, &args.reporter)?;
        // Stake depends on role.
        if args.role != reporter.role && reporter.status() != ReporterStatus::Inactive {
            return Err(RegistryError::InvalidReporterStatus {
                status: reporter.status(),
            });
        }

        reporter.name = args.name;
        reporter.role = args.role;
        self.commit(
            WriteBatch::new().update(args.reporter.address, Reporter::KIND, reporter.encode()),
            None,
        )?;
        info!(reporter = %args.reporter.address, role = ?args.role, "reporter updated");
        let event = RegistryEvent::ReporterUpdated {
            reporter: args.reporter.address,
            name: args.name,
            role: args.role,
        };
        self.finish(reporter, event)
    }

    pub(crate) fn run_set_frozen(
        &self,
        signer: &Pubkey,
        args: ReporterAccounts,
        frozen: bool,
    ) -> RegistryResult<Applied<Reporter>> {
        let _tx = self.tx_lock.lock();
        let mut reporter = self.load_administered(signer, &args.community, &args.reporter)?;

        reporter.is_frozen = frozen;
        self.commit(
            WriteBatch::new().update(args.reporter.address, Reporter::KIND, reporter.encode()),
            None,
        )?;
        let event = if frozen {
            info!(reporter = %args.reporter.address, "reporter frozen");
            RegistryEvent::ReporterFrozen {
                reporter: args.reporter.address,
            }
        } else {
            info!(reporter = %args.reporter.address, "reporter unfrozen");
            RegistryEvent::ReporterUnfrozen {
                reporter: args.reporter.address,
            }
        };
        self.finish(reporter, event)
    }

    pub(crate) fn run_activate_reporter(
        &self,
        signer: &Pubkey,
        args: ReporterAccounts,
    ) -> RegistryResult<Applied<Reporter>> {
        let _tx = self.tx_lock.lock();
        let (community, mut reporter) = self.load_own(signer, &args)?;
        if community.stake_mint != self.token.mint() {
            return Err(RegistryError::InvalidMint);
        }

        let stake = community.config.stake_thresholds.for_role(reporter.role);
        reporter.activate(stake)?;
        let transfer = Transfer {
            from: reporter.principal,
            to: community.stake_custody,
            amount: stake,
        };
        self.commit(
            WriteBatch::new().update(args.reporter.address, Reporter::KIND, reporter.encode()),
            Some(transfer),
        )?;
        info!(reporter = %args.reporter.address, stake, "reporter activated");
        let event = RegistryEvent::ReporterActivated {
            reporter: args.reporter.address,
            stake,
        };
        self.finish(reporter, event)
    }

    pub(crate) fn run_deactivate_reporter(
        &self,
        signer: &Pubkey,
        args: ReporterAccounts,
    ) -> RegistryResult<Applied<Reporter>> {
        let _tx = self.tx_lock.lock();
        let (community, mut reporter) = self.load_own(signer, &args)?;

        let epoch = self.clock.current_epoch();
        reporter.deactivate(epoch, community.config.cooldown_epochs)?;
        let unlock_epoch = reporter.status().unlock_epoch().unwrap_or(epoch);
        self.commit(
            WriteBatch::new().update(args.reporter.address, Reporter::KIND, reporter.encode()),
            None,
        )?;
        info!(reporter = %args.reporter.address, epoch, unlock_epoch, "reporter deactivated");
        let event = RegistryEvent::ReporterDeactivated {
            reporter: args.reporter.address,
            unlock_epoch,
        };
        self.finish(reporter, event)
    }

    pub(crate) fn run_release_reporter(
        &self,
        signer: &Pubkey,
        args: ReporterAccounts,
    ) -> RegistryResult<Applied<Reporter>> {
        let _tx = self.tx_lock.lock();
        let (community, mut reporter) = self.load_own(signer, &args)?;
        if community.stake_mint != self.token.mint() {
            return Err(RegistryError::InvalidMint);
        }

        let epoch = self.clock.current_epoch();
        let stake = reporter.release(epoch)?;
        let transfer = (stake > 0).then(|| Transfer {
            from: community.stake_custody,
            to: reporter.principal,
            amount: stake,
        });
        self.commit(
            WriteBatch::new().update(args.reporter.address, Reporter::KIND, reporter.encode()),
            transfer,
        )?;
        info!(reporter = %args.reporter.address, epoch, stake, "reporter released");
        let event = RegistryEvent::ReporterReleased {
            reporter: args.reporter.address,
            stake,
        };
        self.finish(reporter, event)
    }

    /// Community-authority access to one of its reporters.
    fn load_administered(
        &self,
        signer: &Pubkey,
        community_slot: &SlotRef,
        reporter_slot: &SlotRef,
    ) -> RegistryResult<Reporter> {
        let community: Community = self.load(community_slot)?;
        AuthorizationGuard::check_authority(signer, &community)?;
        let reporter: Reporter = self.load(reporter_slot)?;
        if reporter.community != community_slot.address {
            return Err(RegistryError::CommunityMismatch);
        }
        Ok(reporter)
    }

    /// The reporter's own access to its lifecycle.
    fn load_own(
        &self,
        signer: &Pubkey,
        args: &ReporterAccounts,
    ) -> RegistryResult<(Community, Reporter)> {
        let community: Community = self.load(&args.community)?;
        let reporter: Reporter = self.load(&args.reporter)?;
        AuthorizationGuard::check_reporter_signer(signer, &reporter, args.community.address)?;
        Ok((community, reporter))
    }
}

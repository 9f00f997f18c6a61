use super::{Applied, RegistryService};
use crate::domain::{
    Action, AuthorizationGuard, Case, CaseStatus, Community, Denial, Record, RecordKey,
    RegistryError, RegistryResult, Reporter, ReporterRole,
};
use crate::events::RegistryEvent;
use crate::instruction::{CreateCase, UpdateCase};
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
    pub(crate) fn run_create_case(
        &self,
        signer: &Pubkey,
        args: CreateCase,
    ) -> RegistryResult<Applied<Case>> {
        let _tx = self.tx_lock.lock();
        let mut community: Community = self.load(&args.community)?;
        let reporter: Reporter = self.load(&args.reporter)?;
        let auth = AuthorizationGuard::authorize(
            signer,
            args.reporter.address,
            &reporter,
            args.community.address,
            &community,
            Action::CreateCase,
        )?;

        let expected = community.next_case_id()?;
        if args.case_id != expected {
            return Err(RegistryError::SequenceMismatch {
                expected,
                actual: args.case_id,
            });
        }
        let key = RecordKey::Case {
            community: args.community.address,
            id: expected,
        };
        self.claim(&key, &args.case)?;
        let case = Case {
            community: args.community.address,
            nonce: args.case.nonce,
            id: expected,
            reporter: args.reporter.address,
            status: CaseStatus::Open,
            name: args.name,
        };

        let batch = WriteBatch::new()
            .create(key, args.case, case.encode())
            .update(args.community.address, Community::KIND, community.encode());
        self.commit_authorized(auth, batch)?;
        info!(
            community = %args.community.address,
            case_id = expected,
            name = %args.name,
            "case created"
        );
        let event = RegistryEvent::CaseCreated {
            community: args.community.address,
            case: args.case.address,
            case_id: expected,
            reporter: args.reporter.address,
        };
        self.finish(case, event)
    }

    pub(crate) fn run_update_case(
        &self,
        signer: &Pubkey,
        args: UpdateCase,
    ) -> RegistryResult<Applied<Case>> {
        let _tx = self.tx_lock.lock();
        let community: Community = self.load(&args.community)?;
        let reporter: Reporter = self.load(&args.reporter)?;
        let auth = AuthorizationGuard::authorize(
            signer,
            args.reporter.address,
            &reporter,
            args.community.address,
            &community,
            Action::UpdateCase,
        )?;
        let mut case: Case = self.load(&args.case)?;
        if case.community != args.community.address {
            return Err(RegistryError::CaseMismatch);
        }
        if case.reporter != args.reporter.address && reporter.role != ReporterRole::Authority {
            return Err(Denial::NotCaseOwner.into());
        }

        if let Some(name) = args.name {
            case.name = name;
        }
        if let Some(status) = args.status {
            case.status = status;
        }
        self.commit_authorized(
            auth,
            WriteBatch::new().update(args.case.address, Case::KIND, case.encode()),
        )?;
        info!(case = %args.case.address, case_id = case.id, status = ?case.status, "case updated");
        let event = RegistryEvent::CaseUpdated {
            case: args.case.address,
            status: case.status,
            name: case.name,
        };
        self.finish(case, event)
    }
}

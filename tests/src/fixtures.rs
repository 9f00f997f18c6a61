//! Shared test world: a ledger with one initialized community.

use rand::random;
use std::cell::RefCell;
use registry_core::domain::{
    pad_key, AddressRecord, AssetRecord, Case, CaseId, Category, Community, CommunityConfig,
    FixedName, PermissionMatrix, RecordKey, Reporter, ReporterRole, RewardConfig, SlotRef,
    StakeThresholds,
};
use registry_core::instruction::*;
use registry_core::ports::RegistryApi;
use registry_core::{RegistryError, RegistryResult};
use registry_node::{
    GenesisBalance, GenesisConfig, Ledger, LedgerError, SignedInstruction, TransactionReceipt,
};
use shared_types::{Keypair, Pubkey, TokenAmount};

pub const VALIDATOR_STAKE: TokenAmount = 1000;
pub const TRACER_STAKE: TokenAmount = 2000;
pub const FULL_STAKE: TokenAmount = 3000;
pub const AUTHORITY_STAKE: TokenAmount = 4000;
pub const CONFIRMATION_THRESHOLD: u32 = 2;
pub const COOLDOWN: u64 = 5;
pub const START_EPOCH: u64 = 100;
pub const STARTING_BALANCE: TokenAmount = 10_000;

pub fn fresh_keypair() -> Keypair {
    Keypair::from_seed(random())
}

pub fn community_config() -> CommunityConfig {
    CommunityConfig {
        stake_thresholds: StakeThresholds {
            validator: VALIDATOR_STAKE,
            tracer: TRACER_STAKE,
            full: FULL_STAKE,
            authority: AUTHORITY_STAKE,
        },
        confirmation_threshold: CONFIRMATION_THRESHOLD,
        cooldown_epochs: COOLDOWN,
        permissions: PermissionMatrix::default(),
    }
}

/// A funded principal with its reporter slot.
pub struct Member {
    pub keypair: Keypair,
    pub reporter: SlotRef,
}

impl Member {
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }
}

/// Principals funded at genesis, handed out by [`World::member`].
const FUNDED_PRINCIPALS: usize = 6;

pub struct World {
    pub ledger: Ledger,
    pub authority: Keypair,
    pub community_id: Pubkey,
    pub community: SlotRef,
    funded: RefCell<Vec<Keypair>>,
}

impl World {
    /// Fresh registry namespace, mint and authority; community initialized.
    pub fn new() -> Self {
        Self::with_balances(&[])
    }

    /// Like [`World::new`], with extra genesis balances.
    pub fn with_balances(extra: &[(Pubkey, TokenAmount)]) -> Self {
        let registry_id = Pubkey(random());
        let mint = Pubkey(random());
        let ledger = Ledger::new(registry_id, mint, START_EPOCH).unwrap();
        let funded: Vec<Keypair> = (0..FUNDED_PRINCIPALS).map(|_| fresh_keypair()).collect();
        let balances = funded
            .iter()
            .map(|keypair| (keypair.pubkey(), STARTING_BALANCE))
            .chain(extra.iter().copied())
            .map(|(account, amount)| GenesisBalance { account, amount })
            .collect();
        ledger
            .apply_genesis(&GenesisConfig {
                epoch: None,
                balances,
            })
            .unwrap();
        let authority = fresh_keypair();
        let community_id = Pubkey(random());
        let community = ledger
            .slot_for(&RecordKey::Community { id: community_id })
            .unwrap();
        let world = Self {
            ledger,
            authority,
            community_id,
            community,
            funded: RefCell::new(funded),
        };
        world
            .send(
                &world.authority,
                Instruction::InitializeCommunity(InitializeCommunity {
                    community,
                    id: community_id,
                    stake_mint: mint,
                    config: community_config(),
                }),
            )
            .unwrap();
        world
    }

    pub fn send(
        &self,
        signer: &Keypair,
        instruction: Instruction,
    ) -> Result<TransactionReceipt, LedgerError> {
        self.ledger.submit(self.sign(signer, instruction))
    }

    /// Sign with the signer's next nonce.
    pub fn sign(&self, signer: &Keypair, instruction: Instruction) -> SignedInstruction {
        let nonce = self.ledger.next_nonce(&signer.pubkey());
        SignedInstruction::sign(&self.ledger.registry_id(), signer, nonce, instruction).unwrap()
    }

    /// Submit and unwrap the core error, for asserting on it.
    pub fn send_err(&self, signer: &Keypair, instruction: Instruction) -> RegistryError {
        match self.send(signer, instruction) {
            Err(LedgerError::Registry(err)) => err,
            other => panic!("expected a registry error, got {:?}", other),
        }
    }

    pub fn slot(&self, key: RecordKey) -> SlotRef {
        self.ledger.slot_for(&key).unwrap()
    }

    pub fn reporter_slot(&self, principal: Pubkey) -> SlotRef {
        self.slot(RecordKey::Reporter {
            community: self.community.address,
            principal,
        })
    }

    pub fn accounts(&self, reporter: SlotRef) -> ReporterAccounts {
        ReporterAccounts {
            community: self.community,
            reporter,
        }
    }

    /// Create (but do not activate) a reporter for the next funded principal.
    pub fn member(&self, name: &str, role: ReporterRole) -> Member {
        let keypair = self
            .funded
            .borrow_mut()
            .pop()
            .expect("every funded principal is already a member");
        let principal = keypair.pubkey();
        let reporter = self.reporter_slot(principal);
        self.send(
            &self.authority,
            Instruction::CreateReporter(CreateReporter {
                community: self.community,
                reporter,
                principal,
                name: FixedName::new(name).unwrap(),
                role,
            }),
        )
        .unwrap();
        Member { keypair, reporter }
    }

    pub fn active_member(&self, name: &str, role: ReporterRole) -> Member {
        let member = self.member(name, role);
        self.send(
            &member.keypair,
            Instruction::ActivateReporter(self.accounts(member.reporter)),
        )
        .unwrap();
        member
    }

    pub fn network(&self, name: &str) -> SlotRef {
        let name = FixedName::new(name).unwrap();
        let network = self.slot(RecordKey::Network {
            community: self.community.address,
            name,
        });
        self.send(
            &self.authority,
            Instruction::CreateNetwork(CreateNetwork {
                community: self.community,
                network,
                name,
                rewards: RewardConfig::default(),
            }),
        )
        .unwrap();
        network
    }

    pub fn case_slot(&self, id: CaseId) -> SlotRef {
        self.slot(RecordKey::Case {
            community: self.community.address,
            id,
        })
    }

    pub fn create_case(&self, member: &Member, case_id: CaseId, name: &str) -> Instruction {
        Instruction::CreateCase(CreateCase {
            community: self.community,
            reporter: member.reporter,
            case: self.case_slot(case_id),
            case_id,
            name: FixedName::new(name).unwrap(),
        })
    }

    /// Open the next case for `member` and return its slot.
    pub fn open_case(&self, member: &Member, name: &str) -> SlotRef {
        let id = self.community_record().case_count() + 1;
        self.send(&member.keypair, self.create_case(member, id, name))
            .unwrap();
        self.case_slot(id)
    }

    pub fn address_key(raw: &str) -> [u8; 32] {
        pad_key(raw.as_bytes()).unwrap()
    }

    pub fn address_slot(&self, network: SlotRef, key: [u8; 32]) -> SlotRef {
        self.slot(RecordKey::Address {
            network: network.address,
            address: key,
        })
    }

    pub fn create_address(
        &self,
        member: &Member,
        network: SlotRef,
        case: SlotRef,
        key: [u8; 32],
        category: Category,
        risk: u8,
    ) -> Instruction {
        Instruction::CreateAddress(CreateAddress {
            community: self.community,
            network,
            case,
            reporter: member.reporter,
            address: self.address_slot(network, key),
            key,
            category,
            risk,
        })
    }

    pub fn confirm(&self, member: &Member, target: SlotRef) -> ConfirmEntity {
        ConfirmEntity {
            community: self.community,
            reporter: member.reporter,
            target,
            confirmation: self.slot(RecordKey::Confirmation {
                record: target.address,
                reporter: member.reporter.address,
            }),
        }
    }

    pub fn community_record(&self) -> Community {
        self.ledger.service().community(&self.community).unwrap()
    }

    pub fn reporter(&self, slot: &SlotRef) -> Reporter {
        self.ledger.service().reporter(slot).unwrap()
    }

    pub fn case(&self, slot: &SlotRef) -> Case {
        self.ledger.service().case(slot).unwrap()
    }

    pub fn address(&self, slot: &SlotRef) -> RegistryResult<AddressRecord> {
        self.ledger.service().address(slot)
    }

    pub fn asset(&self, slot: &SlotRef) -> RegistryResult<AssetRecord> {
        self.ledger.service().asset(slot)
    }

    pub fn bytes(&self, slot: &SlotRef) -> Option<Vec<u8>> {
        self.ledger.record_bytes(&slot.address).unwrap()
    }

    pub fn custody(&self) -> Pubkey {
        self.community_record().stake_custody
    }

    pub fn custody_balance(&self) -> TokenAmount {
        self.ledger.balance(&self.custody())
    }
}

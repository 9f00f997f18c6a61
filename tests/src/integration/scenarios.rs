//! # Registry Scenarios
//!
//! Happy-path flows across the whole registry:
//!
//! 1. **Reporter lifecycle**: stake, report, unstake, release
//! 2. **Case sequence**: ids 1, 2, 3 per community
//! 3. **Classifications**: addresses and assets, reclassification, confirmations

use crate::fixtures::*;
use registry_core::domain::{
    AssetRecord, CaseStatus, Category, Denial, RecordKey, RegistryError, ReporterRole,
    ReporterStatus, RiskScore,
};
use registry_core::events::RegistryEvent;
use registry_core::instruction::*;
use shared_types::Pubkey;

// =============================================================================
// REPORTER LIFECYCLE
// =============================================================================

#[test]
fn test_full_reporter_opens_case_and_reports_address() {
    let world = World::new();
    let alice = world.member("alice", ReporterRole::Full);
    let custody_before = world.custody_balance();

    let receipt = world
        .send(
            &alice.keypair,
            Instruction::ActivateReporter(world.accounts(alice.reporter)),
        )
        .unwrap();
    assert_eq!(
        receipt.events,
        vec![RegistryEvent::ReporterActivated {
            reporter: alice.reporter.address,
            stake: FULL_STAKE,
        }]
    );
    assert_eq!(
        world.ledger.balance(&alice.pubkey()),
        STARTING_BALANCE - FULL_STAKE
    );
    assert_eq!(world.custody_balance(), custody_before + FULL_STAKE);

    world
        .send(
            &alice.keypair,
            world.create_case(&alice, 1, "safe network addresses"),
        )
        .unwrap();
    let case = world.case(&world.case_slot(1));
    assert_eq!(case.id, 1);
    assert_eq!(case.name.as_str(), "safe network addresses");
    assert_eq!(case.status, CaseStatus::Open);
    assert_eq!(world.community_record().case_count(), 1);

    let network = world.network("ethereum");
    let key = World::address_key("0x742d35cc6634c0532925a3b844bc45");
    let address = world.address_slot(network, key);
    world
        .send(
            &alice.keypair,
            world.create_address(&alice, network, world.case_slot(1), key, Category::None, 0),
        )
        .unwrap();

    let record = world.address(&address).unwrap();
    assert_eq!(record.confirmations, 0);
    assert_eq!(record.category, Category::None);
    assert_eq!(record.risk, RiskScore::new(0).unwrap());
    assert_eq!(record.case_id, 1);
    assert_eq!(record.reporter, alice.reporter.address);
    assert_eq!(world.bytes(&address).map(|b| b.len()), Some(148));
}

#[test]
fn test_deactivated_tracer_cannot_report() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let bob = world.active_member("bob", ReporterRole::Tracer);
    let network = world.network("bitcoin");
    let case = world.open_case(&alice, "ransomware payouts");

    world
        .send(
            &bob.keypair,
            Instruction::DeactivateReporter(world.accounts(bob.reporter)),
        )
        .unwrap();
    let status = world.reporter(&bob.reporter).status();
    assert_eq!(
        status,
        ReporterStatus::Unstaking {
            unlock_epoch: START_EPOCH + COOLDOWN
        }
    );

    let key = World::address_key("bc1qxy2kgdygjrsqtzq2n0yrf2493p83");
    let err = world.send_err(
        &bob.keypair,
        world.create_address(&bob, network, case, key, Category::Ransomware, 9),
    );
    assert_eq!(err, RegistryError::InvalidReporterStatus { status });
    assert!(world.bytes(&world.address_slot(network, key)).is_none());
}

#[test]
fn test_stake_released_after_cooldown() {
    let world = World::new();
    let carol = world.active_member("carol", ReporterRole::Validator);
    let accounts = world.accounts(carol.reporter);
    world
        .send(&carol.keypair, Instruction::DeactivateReporter(accounts))
        .unwrap();

    world.ledger.advance_epoch(COOLDOWN - 1);
    let err = world.send_err(&carol.keypair, Instruction::ReleaseReporter(accounts));
    assert_eq!(
        err,
        RegistryError::ReleaseEpochInFuture {
            unlock_epoch: START_EPOCH + COOLDOWN,
            current_epoch: START_EPOCH + COOLDOWN - 1,
        }
    );
    assert_eq!(
        world.ledger.balance(&carol.pubkey()),
        STARTING_BALANCE - VALIDATOR_STAKE
    );

    world.ledger.advance_epoch(1);
    let receipt = world
        .send(&carol.keypair, Instruction::ReleaseReporter(accounts))
        .unwrap();
    assert_eq!(
        receipt.events,
        vec![RegistryEvent::ReporterReleased {
            reporter: carol.reporter.address,
            stake: VALIDATOR_STAKE,
        }]
    );
    let reporter = world.reporter(&carol.reporter);
    assert_eq!(reporter.status(), ReporterStatus::Inactive);
    assert_eq!(reporter.stake, 0);
    assert_eq!(world.ledger.balance(&carol.pubkey()), STARTING_BALANCE);
    assert_eq!(world.custody_balance(), 0);

    // A released reporter can stake again.
    world
        .send(&carol.keypair, Instruction::ActivateReporter(accounts))
        .unwrap();
    assert!(world.reporter(&carol.reporter).status().is_active());
}

#[test]
fn test_role_change_requires_inactive() {
    let world = World::new();
    let dave = world.active_member("dave", ReporterRole::Tracer);
    let update = |role| {
        Instruction::UpdateReporter(UpdateReporter {
            community: world.community,
            reporter: dave.reporter,
            name: registry_core::domain::FixedName::new("dave").unwrap(),
            role,
        })
    };

    let err = world.send_err(&world.authority, update(ReporterRole::Authority));
    assert_eq!(
        err,
        RegistryError::InvalidReporterStatus {
            status: ReporterStatus::Active
        }
    );

    // Renaming without a role change is fine while active.
    world
        .send(&world.authority, update(ReporterRole::Tracer))
        .unwrap();
}

// =============================================================================
// CASES
// =============================================================================

#[test]
fn test_case_ids_are_sequential() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);

    for id in 1..=3 {
        let receipt = world
            .send(&alice.keypair, world.create_case(&alice, id, "case"))
            .unwrap();
        assert!(matches!(
            receipt.events.as_slice(),
            [RegistryEvent::CaseCreated { case_id, .. }] if *case_id == id
        ));
    }
    assert_eq!(world.community_record().case_count(), 3);

    let err = world.send_err(&alice.keypair, world.create_case(&alice, 5, "skip"));
    assert_eq!(
        err,
        RegistryError::SequenceMismatch {
            expected: 4,
            actual: 5
        }
    );
    let err = world.send_err(&alice.keypair, world.create_case(&alice, 2, "repeat"));
    assert_eq!(
        err,
        RegistryError::SequenceMismatch {
            expected: 4,
            actual: 2
        }
    );
    assert_eq!(world.community_record().case_count(), 3);
}

#[test]
fn test_closed_case_accepts_no_findings() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let network = world.network("solana");
    let case = world.open_case(&alice, "closing soon");

    world
        .send(
            &alice.keypair,
            Instruction::UpdateCase(UpdateCase {
                community: world.community,
                reporter: alice.reporter,
                case,
                name: None,
                status: Some(CaseStatus::Closed),
            }),
        )
        .unwrap();

    let key = World::address_key("late finding");
    let err = world.send_err(
        &alice.keypair,
        world.create_address(&alice, network, case, key, Category::Scam, 7),
    );
    assert_eq!(err, RegistryError::CaseClosed { case_id: 1 });
}

#[test]
fn test_only_owner_or_authority_updates_case() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let erin = world.active_member("erin", ReporterRole::Full);
    let boss = world.active_member("boss", ReporterRole::Authority);
    let case = world.open_case(&alice, "owned by alice");
    let rename = |member: &Member, name: &str| {
        Instruction::UpdateCase(UpdateCase {
            community: world.community,
            reporter: member.reporter,
            case,
            name: Some(registry_core::domain::FixedName::new(name).unwrap()),
            status: None,
        })
    };

    let err = world.send_err(&erin.keypair, rename(&erin, "hijacked"));
    assert_eq!(err, RegistryError::Unauthorized(Denial::NotCaseOwner));

    world
        .send(&boss.keypair, rename(&boss, "reviewed"))
        .unwrap();
    assert_eq!(world.case(&case).name.as_str(), "reviewed");
}

// =============================================================================
// CLASSIFICATIONS
// =============================================================================

#[test]
fn test_confirmations_reach_threshold() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let carol = world.active_member("carol", ReporterRole::Validator);
    let dave = world.active_member("dave", ReporterRole::Validator);
    let network = world.network("ethereum");
    let case = world.open_case(&alice, "phishing kit");
    let key = World::address_key("phisher");
    let address = world.address_slot(network, key);
    world
        .send(
            &alice.keypair,
            world.create_address(&alice, network, case, key, Category::Scam, 8),
        )
        .unwrap();

    let receipt = world
        .send(
            &carol.keypair,
            Instruction::ConfirmAddress(world.confirm(&carol, address)),
        )
        .unwrap();
    assert_eq!(
        receipt.events,
        vec![RegistryEvent::AddressConfirmed {
            address: address.address,
            reporter: carol.reporter.address,
            confirmations: 1,
            threshold_reached: false,
        }]
    );

    let receipt = world
        .send(
            &dave.keypair,
            Instruction::ConfirmAddress(world.confirm(&dave, address)),
        )
        .unwrap();
    assert_eq!(
        receipt.events,
        vec![RegistryEvent::AddressConfirmed {
            address: address.address,
            reporter: dave.reporter.address,
            confirmations: 2,
            threshold_reached: true,
        }]
    );

    // Threshold is informational; classification is untouched.
    let record = world.address(&address).unwrap();
    assert_eq!(record.confirmations, 2);
    assert_eq!(record.category, Category::Scam);
    assert_eq!(record.risk.value(), 8);
}

#[test]
fn test_asset_lifecycle() {
    let world = World::new();
    let tracer = world.active_member("tracer", ReporterRole::Tracer);
    let alice = world.active_member("alice", ReporterRole::Full);
    let boss = world.active_member("boss", ReporterRole::Authority);
    let carol = world.active_member("carol", ReporterRole::Validator);
    let network = world.network("ethereum");
    let case = world.open_case(&alice, "stolen nfts");

    let mint = Pubkey([0x77; 32]);
    let asset_id = World::address_key("token #4521");
    let asset = world.slot(RecordKey::Asset {
        network: network.address,
        mint,
        asset_id,
    });
    world
        .send(
            &tracer.keypair,
            Instruction::CreateAsset(CreateAsset {
                community: world.community,
                network,
                case,
                reporter: tracer.reporter,
                asset,
                mint,
                asset_id,
                category: Category::Theft,
                risk: 6,
            }),
        )
        .unwrap();
    assert_eq!(world.bytes(&asset).map(|b| b.len()), Some(180));

    let reclassify = |member: &Member, risk| {
        Instruction::UpdateAsset(UpdateEntity {
            community: world.community,
            reporter: member.reporter,
            target: asset,
            category: Category::Counterfeit,
            risk,
        })
    };
    let err = world.send_err(&tracer.keypair, reclassify(&tracer, 9));
    assert!(matches!(
        err,
        RegistryError::Unauthorized(Denial::RoleNotPermitted { .. })
    ));
    world.send(&boss.keypair, reclassify(&boss, 9)).unwrap();

    world
        .send(
            &carol.keypair,
            Instruction::ConfirmAsset(world.confirm(&carol, asset)),
        )
        .unwrap();

    let record: AssetRecord = world.asset(&asset).unwrap();
    assert_eq!(record.category, Category::Counterfeit);
    assert_eq!(record.risk.value(), 9);
    assert_eq!(record.confirmations, 1);
    assert_eq!(record.reporter, tracer.reporter.address);
}

#[test]
fn test_every_commit_is_published() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    world.network("ethereum");
    world.open_case(&alice, "audit trail");

    let names: Vec<&str> = world.ledger.events().iter().map(|e| e.name()).collect();
    assert_eq!(
        names,
        vec![
            "CommunityInitialized",
            "ReporterCreated",
            "ReporterActivated",
            "NetworkCreated",
            "CaseCreated",
        ]
    );
    assert_eq!(world.ledger.height(), 5);
}

//! # Adversarial Cases
//!
//! Attempts to break the registry's guarantees from the outside:
//!
//! - forged or stale slot references
//! - replayed creations and transactions
//! - signer substitution and privilege escalation
//! - out-of-range inputs
//!
//! Every rejected attempt must leave the stored bytes exactly as they were.

use crate::fixtures::*;
use registry_core::domain::{
    Action, CaseStatus, Category, Denial, FixedName, RecordKey, RegistryError, ReporterRole, ReporterStatus,
    SlotKind, SlotRef,
};
use registry_core::instruction::*;
use registry_node::LedgerError;
use shared_types::{Pubkey, SignatureError};

fn forged(slot: SlotRef) -> SlotRef {
    SlotRef {
        address: slot.address,
        nonce: slot.nonce.wrapping_add(1),
    }
}

// =============================================================================
// DUPLICATE CREATION
// =============================================================================

#[test]
fn test_duplicate_address_leaves_record_untouched() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let mallory = world.active_member("mallory", ReporterRole::Tracer);
    let network = world.network("ethereum");
    let case = world.open_case(&alice, "original");
    let key = World::address_key("victim wallet");
    let address = world.address_slot(network, key);

    world
        .send(
            &alice.keypair,
            world.create_address(&alice, network, case, key, Category::None, 0),
        )
        .unwrap();
    let before = world.bytes(&address);

    // Second reporter tries to overwrite the classification.
    let err = world.send_err(
        &mallory.keypair,
        world.create_address(&mallory, network, case, key, Category::Sanctions, 10),
    );
    assert_eq!(
        err,
        RegistryError::DuplicateInitialization {
            slot: address.address
        }
    );
    assert_eq!(world.bytes(&address), before);
}

#[test]
fn test_duplicate_reporter_and_network_rejected() {
    let world = World::new();
    let alice = world.member("alice", ReporterRole::Full);
    let reporter_before = world.bytes(&alice.reporter);

    let err = world.send_err(
        &world.authority,
        Instruction::CreateReporter(CreateReporter {
            community: world.community,
            reporter: alice.reporter,
            principal: alice.pubkey(),
            name: FixedName::new("alice again").unwrap(),
            role: ReporterRole::Authority,
        }),
    );
    assert!(matches!(err, RegistryError::DuplicateInitialization { .. }));
    assert_eq!(world.bytes(&alice.reporter), reporter_before);

    let network = world.network("tron");
    let network_before = world.bytes(&network);
    let err = world.send_err(
        &world.authority,
        Instruction::CreateNetwork(CreateNetwork {
            community: world.community,
            network,
            name: FixedName::new("tron").unwrap(),
            rewards: Default::default(),
        }),
    );
    assert!(matches!(err, RegistryError::DuplicateInitialization { .. }));
    assert_eq!(world.bytes(&network), network_before);
}

#[test]
fn test_double_confirmation_rejected() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let carol = world.active_member("carol", ReporterRole::Validator);
    let network = world.network("ethereum");
    let case = world.open_case(&alice, "mixer outputs");
    let key = World::address_key("mixer");
    let address = world.address_slot(network, key);
    world
        .send(
            &alice.keypair,
            world.create_address(&alice, network, case, key, Category::Mixer, 7),
        )
        .unwrap();

    world
        .send(
            &carol.keypair,
            Instruction::ConfirmAddress(world.confirm(&carol, address)),
        )
        .unwrap();
    let before = world.bytes(&address);
    let err = world.send_err(
        &carol.keypair,
        Instruction::ConfirmAddress(world.confirm(&carol, address)),
    );
    assert!(matches!(err, RegistryError::DuplicateInitialization { .. }));
    assert_eq!(world.bytes(&address), before);
    assert_eq!(world.address(&address).unwrap().confirmations, 1);
}

#[test]
fn test_creator_cannot_confirm_own_record() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let network = world.network("ethereum");
    let case = world.open_case(&alice, "self promotion");
    let key = World::address_key("alice's pick");
    let address = world.address_slot(network, key);
    world
        .send(
            &alice.keypair,
            world.create_address(&alice, network, case, key, Category::Exchange, 1),
        )
        .unwrap();

    let err = world.send_err(
        &alice.keypair,
        Instruction::ConfirmAddress(world.confirm(&alice, address)),
    );
    assert_eq!(err, RegistryError::Unauthorized(Denial::CreatorCannotConfirm));
    assert_eq!(world.address(&address).unwrap().confirmations, 0);
}

// =============================================================================
// FORGED SLOT REFERENCES
// =============================================================================

#[test]
fn test_wrong_nonce_on_reference_is_ownership_error() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);

    let err = world.send_err(
        &alice.keypair,
        Instruction::CreateCase(CreateCase {
            community: forged(world.community),
            reporter: alice.reporter,
            case: world.case_slot(1),
            case_id: 1,
            name: FixedName::new("forged").unwrap(),
        }),
    );
    assert_eq!(
        err,
        RegistryError::Ownership {
            slot: world.community.address,
            expected: SlotKind::Community,
        }
    );
    assert_eq!(world.community_record().case_count(), 0);
}

#[test]
fn test_non_canonical_creation_slot_rejected() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let case = world.case_slot(1);

    let err = world.send_err(
        &alice.keypair,
        Instruction::CreateCase(CreateCase {
            community: world.community,
            reporter: alice.reporter,
            case: forged(case),
            case_id: 1,
            name: FixedName::new("forged").unwrap(),
        }),
    );
    assert!(matches!(err, RegistryError::Ownership { .. }));
    assert!(world.bytes(&case).is_none());
}

#[test]
fn test_record_of_wrong_kind_rejected() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);

    // Pass the reporter slot where the community is expected.
    let err = world.send_err(
        &alice.keypair,
        Instruction::CreateCase(CreateCase {
            community: alice.reporter,
            reporter: alice.reporter,
            case: world.case_slot(1),
            case_id: 1,
            name: FixedName::new("confused").unwrap(),
        }),
    );
    assert_eq!(
        err,
        RegistryError::Ownership {
            slot: alice.reporter.address,
            expected: SlotKind::Community,
        }
    );
}

#[test]
fn test_reporter_from_other_community_rejected() {
    let home = World::new();
    let alice = home.active_member("alice", ReporterRole::Full);

    // Second community in the same registry.
    let other_id = Pubkey([0xEE; 32]);
    let other = home.slot(RecordKey::Community { id: other_id });
    home.send(
        &home.authority,
        Instruction::InitializeCommunity(InitializeCommunity {
            community: other,
            id: other_id,
            stake_mint: home.ledger.stake_mint(),
            config: community_config(),
        }),
    )
    .unwrap();
    let case = home.slot(RecordKey::Case {
        community: other.address,
        id: 1,
    });

    let err = home.send_err(
        &alice.keypair,
        Instruction::CreateCase(CreateCase {
            community: other,
            reporter: alice.reporter,
            case,
            case_id: 1,
            name: FixedName::new("trespass").unwrap(),
        }),
    );
    assert_eq!(err, RegistryError::CommunityMismatch);
    assert!(home.bytes(&case).is_none());
}

// =============================================================================
// SIGNERS AND PRIVILEGES
// =============================================================================

#[test]
fn test_tampered_transaction_rejected_before_execution() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let height = world.ledger.height();

    let mut tx = world.sign(&alice.keypair, world.create_case(&alice, 1, "honest"));
    // Swap the payload after signing.
    tx.instruction = world.create_case(&alice, 1, "tampered");

    assert!(matches!(
        world.ledger.submit(tx),
        Err(LedgerError::BadSignature(SignatureError::VerificationFailed))
    ));
    assert_eq!(world.ledger.height(), height);
    assert!(world.bytes(&world.case_slot(1)).is_none());
}

#[test]
fn test_replayed_activation_after_release_rejected() {
    let world = World::new();
    let alice = world.member("alice", ReporterRole::Full);
    let accounts = world.accounts(alice.reporter);

    let activate = world.sign(&alice.keypair, Instruction::ActivateReporter(accounts));
    world.ledger.submit(activate.clone()).unwrap();
    world
        .send(&alice.keypair, Instruction::DeactivateReporter(accounts))
        .unwrap();
    world.ledger.advance_epoch(COOLDOWN);
    world
        .send(&alice.keypair, Instruction::ReleaseReporter(accounts))
        .unwrap();
    assert_eq!(world.ledger.balance(&alice.pubkey()), STARTING_BALANCE);
    let height = world.ledger.height();

    // Anyone holding the old activation resubmits it unchanged.
    assert!(matches!(
        world.ledger.submit(activate),
        Err(LedgerError::StaleNonce {
            expected: 3,
            actual: 0,
            ..
        })
    ));
    assert_eq!(world.ledger.balance(&alice.pubkey()), STARTING_BALANCE);
    assert_eq!(
        world.reporter(&alice.reporter).status(),
        ReporterStatus::Inactive
    );
    assert_eq!(world.custody_balance(), 0);
    assert_eq!(world.ledger.height(), height);
}

#[test]
fn test_replayed_reopen_of_closed_case_rejected() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let case = world.open_case(&alice, "short lived");
    let set_status = |status| {
        Instruction::UpdateCase(UpdateCase {
            community: world.community,
            reporter: alice.reporter,
            case,
            name: None,
            status: Some(status),
        })
    };

    let reopen = world.sign(&alice.keypair, set_status(CaseStatus::Open));
    world.ledger.submit(reopen.clone()).unwrap();
    world
        .send(&alice.keypair, set_status(CaseStatus::Closed))
        .unwrap();
    let closed = world.bytes(&case);

    assert!(matches!(
        world.ledger.submit(reopen),
        Err(LedgerError::StaleNonce { .. })
    ));
    assert_eq!(world.case(&case).status, CaseStatus::Closed);
    assert_eq!(world.bytes(&case), closed);
}

#[test]
fn test_signer_must_own_reporter_slot() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let mallory = world.active_member("mallory", ReporterRole::Validator);

    // Mallory signs with her own key but names Alice's reporter.
    let err = world.send_err(&mallory.keypair, world.create_case(&alice, 1, "spoofed"));
    assert_eq!(err, RegistryError::Unauthorized(Denial::SignerMismatch));

    let err = world.send_err(
        &mallory.keypair,
        Instruction::DeactivateReporter(world.accounts(alice.reporter)),
    );
    assert_eq!(err, RegistryError::Unauthorized(Denial::SignerMismatch));
    assert!(world.reporter(&alice.reporter).status().is_active());
}

#[test]
fn test_role_without_permission_denied() {
    let world = World::new();
    let carol = world.active_member("carol", ReporterRole::Validator);

    let err = world.send_err(&carol.keypair, world.create_case(&carol, 1, "not mine"));
    assert_eq!(
        err,
        RegistryError::Unauthorized(Denial::RoleNotPermitted {
            role: ReporterRole::Validator,
            action: Action::CreateCase,
        })
    );
    assert_eq!(world.community_record().case_count(), 0);
}

#[test]
fn test_only_authority_administers() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Authority);
    let stranger = fresh_keypair();

    let err = world.send_err(
        &alice.keypair,
        Instruction::FreezeReporter(world.accounts(alice.reporter)),
    );
    assert_eq!(err, RegistryError::Unauthorized(Denial::AuthorityMismatch));

    let err = world.send_err(
        &alice.keypair,
        Instruction::SetCommunityAuthority(SetCommunityAuthority {
            community: world.community,
            new_authority: alice.pubkey(),
        }),
    );
    assert_eq!(err, RegistryError::Unauthorized(Denial::AuthorityMismatch));

    let err = world.send_err(
        &stranger,
        Instruction::CreateReporter(CreateReporter {
            community: world.community,
            reporter: world.reporter_slot(stranger.pubkey()),
            principal: stranger.pubkey(),
            name: FixedName::new("self appointed").unwrap(),
            role: ReporterRole::Authority,
        }),
    );
    assert_eq!(err, RegistryError::Unauthorized(Denial::AuthorityMismatch));
    assert_eq!(world.community_record().authority, world.authority.pubkey());
}

#[test]
fn test_authority_handover() {
    let world = World::new();
    let successor = fresh_keypair();
    world
        .send(
            &world.authority,
            Instruction::SetCommunityAuthority(SetCommunityAuthority {
                community: world.community,
                new_authority: successor.pubkey(),
            }),
        )
        .unwrap();

    // The previous authority lost its rights.
    let err = world.send_err(
        &world.authority,
        Instruction::CreateNetwork(CreateNetwork {
            community: world.community,
            network: world.slot(RecordKey::Network {
                community: world.community.address,
                name: FixedName::new("polygon").unwrap(),
            }),
            name: FixedName::new("polygon").unwrap(),
            rewards: Default::default(),
        }),
    );
    assert_eq!(err, RegistryError::Unauthorized(Denial::AuthorityMismatch));
    assert_eq!(world.community_record().authority, successor.pubkey());
}

#[test]
fn test_frozen_reporter_locked_out() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let accounts = world.accounts(alice.reporter);
    world
        .send(&world.authority, Instruction::FreezeReporter(accounts))
        .unwrap();

    let err = world.send_err(&alice.keypair, world.create_case(&alice, 1, "frozen"));
    assert_eq!(err, RegistryError::FrozenReporter);
    let err = world.send_err(&alice.keypair, Instruction::DeactivateReporter(accounts));
    assert_eq!(err, RegistryError::FrozenReporter);

    world
        .send(&world.authority, Instruction::UnfreezeReporter(accounts))
        .unwrap();
    world
        .send(&alice.keypair, world.create_case(&alice, 1, "thawed"))
        .unwrap();
}

// =============================================================================
// INPUT VALIDATION
// =============================================================================

#[test]
fn test_risk_out_of_range_rejected_before_mutation() {
    let world = World::new();
    let alice = world.active_member("alice", ReporterRole::Full);
    let network = world.network("ethereum");
    let case = world.open_case(&alice, "overrated");
    let key = World::address_key("too risky");
    let height = world.ledger.height();

    let err = world.send_err(
        &alice.keypair,
        world.create_address(&alice, network, case, key, Category::Hacker, 11),
    );
    assert_eq!(err, RegistryError::RiskOutOfRange(11));
    assert!(world.bytes(&world.address_slot(network, key)).is_none());
    assert_eq!(world.ledger.height(), height);
}

#[test]
fn test_insufficient_stake_changes_nothing() {
    let poor = fresh_keypair();
    let world = World::with_balances(&[(poor.pubkey(), 100)]);
    let reporter = world.reporter_slot(poor.pubkey());
    world
        .send(
            &world.authority,
            Instruction::CreateReporter(CreateReporter {
                community: world.community,
                reporter,
                principal: poor.pubkey(),
                name: FixedName::new("poor").unwrap(),
                role: ReporterRole::Full,
            }),
        )
        .unwrap();

    let err = world.send_err(&poor, Instruction::ActivateReporter(world.accounts(reporter)));
    assert_eq!(
        err,
        RegistryError::InsufficientStake {
            required: FULL_STAKE,
            available: 100,
        }
    );
    assert_eq!(world.ledger.balance(&poor.pubkey()), 100);
    assert_eq!(world.custody_balance(), 0);
    assert_eq!(world.reporter(&reporter).status(), ReporterStatus::Inactive);
}

#[test]
fn test_lifecycle_edges_enforced() {
    let world = World::new();
    let alice = world.member("alice", ReporterRole::Full);
    let accounts = world.accounts(alice.reporter);

    let err = world.send_err(&alice.keypair, Instruction::DeactivateReporter(accounts));
    assert_eq!(
        err,
        RegistryError::InvalidReporterStatus {
            status: ReporterStatus::Inactive
        }
    );

    world
        .send(&alice.keypair, Instruction::ActivateReporter(accounts))
        .unwrap();
    let err = world.send_err(&alice.keypair, Instruction::ActivateReporter(accounts));
    assert_eq!(
        err,
        RegistryError::InvalidReporterStatus {
            status: ReporterStatus::Active
        }
    );
    // Only one stake was taken.
    assert_eq!(
        world.ledger.balance(&alice.pubkey()),
        STARTING_BALANCE - FULL_STAKE
    );
}

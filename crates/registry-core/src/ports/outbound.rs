//! # Driven Ports (SPI - Outbound)
//!
//! Collaborators the registry core depends on:
//! - Record storage (the replicated ledger state)
//! - The stake token ledger
//! - The external epoch counter
//! - Event publication

use crate::domain::{RecordKey, RegistryResult, SlotAddress, SlotKind, SlotRef};
use crate::events::RegistryEvent;
use shared_types::{Epoch, Pubkey, TokenAmount};
use thiserror::Error;

// =============================================================================
// RECORD STORAGE
// =============================================================================

/// A record as held by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredRecord {
    /// Logical key the slot was derived from.
    pub key: RecordKey,
    /// Collision nonce used at creation.
    pub nonce: u8,
    /// Fixed-layout record bytes.
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    /// Occupy a fresh slot. Fails if the key or slot is taken.
    Create {
        key: RecordKey,
        slot: SlotRef,
        data: Vec<u8>,
    },
    /// Overwrite an existing record of `kind` in place. The length may not
    /// change.
    Update {
        slot: SlotAddress,
        kind: SlotKind,
        data: Vec<u8>,
    },
}

/// Writes applied all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(mut self, key: RecordKey, slot: SlotRef, data: Vec<u8>) -> Self {
        self.ops.push(WriteOp::Create { key, slot, data });
        self
    }

    pub fn update(mut self, slot: SlotAddress, kind: SlotKind, data: Vec<u8>) -> Self {
        self.ops.push(WriteOp::Update { slot, kind, data });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Record arena keyed by logical key, addressable by slot.
pub trait RecordStore: Send + Sync {
    fn get(&self, slot: &SlotAddress) -> RegistryResult<Option<StoredRecord>>;

    /// Slot currently holding `key`, if any.
    fn slot_of(&self, key: &RecordKey) -> RegistryResult<Option<SlotAddress>>;

    /// Validate every op, then apply them all. On error nothing is written.
    fn commit(&self, batch: WriteBatch) -> RegistryResult<()>;
}

// =============================================================================
// STAKE TOKEN
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Pubkey,
        required: TokenAmount,
        available: TokenAmount,
    },

    #[error("Balance overflow in {account}")]
    Overflow { account: Pubkey },
}

/// Token ledger for the stake mint.
pub trait StakeToken: Send + Sync {
    /// Mint this ledger moves.
    fn mint(&self) -> Pubkey;

    fn balance(&self, account: &Pubkey) -> TokenAmount;

    fn transfer(&self, from: &Pubkey, to: &Pubkey, amount: TokenAmount) -> Result<(), TokenError>;
}

// =============================================================================
// EPOCH CLOCK
// =============================================================================

/// Externally supplied monotonic epoch counter.
pub trait EpochClock: Send + Sync {
    fn current_epoch(&self) -> Epoch;
}

// =============================================================================
// EVENTS
// =============================================================================

pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: RegistryEvent);
}

//! # Ledger
//!
//! Sequential signed-transaction front end for the registry service.
//!
//! ## Transaction Flow
//!
//! ```text
//! SignedInstruction ──verify ed25519──→ RegistryService::execute ──→ TransactionReceipt
//!        │                                       │
//!        └─ rejected, nothing runs               └─ rejected, nothing committed
//! ```
//!
//! The signed message binds the registry id and a per-signer nonce. A
//! transaction signed for one registry cannot run against another, and each
//! nonce is accepted once: the ledger expects `next_nonce(signer)` and
//! consumes it whenever a correctly signed transaction reaches the core,
//! committed or not.

use crate::genesis::{GenesisConfig, GenesisError};
use crate::NodeConfig;
use parking_lot::Mutex;
use registry_core::adapters::{
    InMemoryEventLog, InMemoryRecordStore, InMemoryStakeToken, ManualEpochClock,
};
use registry_core::domain::{RecordKey, SlotAddress, SlotRef};
use registry_core::events::RegistryEvent;
use registry_core::instruction::Instruction;
use registry_core::ports::{EpochClock, RegistryApi, StakeToken, TokenError};
use registry_core::{RegistryConfig, RegistryDependencies, RegistryError, RegistryService};
use serde::{Deserialize, Serialize};
use shared_types::{signing, Epoch, Keypair, Pubkey, Signature, SignatureError, TokenAmount};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Registry service wired to the in-memory adapters.
pub type LedgerService =
    RegistryService<InMemoryRecordStore, InMemoryStakeToken, ManualEpochClock, InMemoryEventLog>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Signature rejected: {0}")]
    BadSignature(#[from] SignatureError),

    #[error("Failed to encode transaction: {0}")]
    Encoding(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Stale nonce for {signer}: expected {expected}, got {actual}")]
    StaleNonce {
        signer: Pubkey,
        expected: u64,
        actual: u64,
    },

    #[error("Genesis rejected: {0} transactions already committed")]
    GenesisAfterTransactions(u64),

    #[error("Genesis epoch {genesis} is behind the current epoch {current}")]
    EpochRewind { genesis: Epoch, current: Epoch },

    #[error(transparent)]
    Genesis(#[from] GenesisError),

    #[error("Genesis funding failed: {0}")]
    Funding(#[from] TokenError),
}

/// An instruction plus the principal that signed it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInstruction {
    pub signer: Pubkey,
    pub nonce: u64,
    pub instruction: Instruction,
    pub signature: Signature,
}

impl SignedInstruction {
    /// Bytes a principal signs: bincode of `(registry_id, signer, nonce, instruction)`.
    pub fn signing_message(
        registry_id: &Pubkey,
        signer: &Pubkey,
        nonce: u64,
        instruction: &Instruction,
    ) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(&(registry_id, signer, nonce, instruction))
            .map_err(|e| LedgerError::Encoding(e.to_string()))
    }

    pub fn sign(
        registry_id: &Pubkey,
        keypair: &Keypair,
        nonce: u64,
        instruction: Instruction,
    ) -> Result<Self, LedgerError> {
        let signer = keypair.pubkey();
        let message = Self::signing_message(registry_id, &signer, nonce, &instruction)?;
        Ok(Self {
            signer,
            nonce,
            signature: keypair.sign(&message),
            instruction,
        })
    }

    pub fn verify(&self, registry_id: &Pubkey) -> Result<(), LedgerError> {
        let message =
            Self::signing_message(registry_id, &self.signer, self.nonce, &self.instruction)?;
        signing::verify(&self.signer, &message, &self.signature)?;
        Ok(())
    }
}

/// Outcome of one committed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// 1-based position among committed transactions.
    pub sequence: u64,
    pub instruction: String,
    pub signer: Pubkey,
    pub events: Vec<RegistryEvent>,
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Committed transaction count.
    height: u64,
    /// Next expected nonce per signer; absent means 0.
    nonces: HashMap<Pubkey, u64>,
}

pub struct Ledger {
    service: LedgerService,
    token: Arc<InMemoryStakeToken>,
    clock: Arc<ManualEpochClock>,
    events: Arc<InMemoryEventLog>,
    registry_id: Pubkey,
    /// Held for the whole of a submission.
    state: Mutex<LedgerState>,
}

impl Ledger {
    pub fn new(
        registry_id: Pubkey,
        stake_mint: Pubkey,
        initial_epoch: Epoch,
    ) -> Result<Self, LedgerError> {
        let token = Arc::new(InMemoryStakeToken::new(stake_mint));
        let clock = Arc::new(ManualEpochClock::new(initial_epoch));
        let events = Arc::new(InMemoryEventLog::new());
        let service = RegistryService::new(RegistryDependencies {
            store: Arc::new(InMemoryRecordStore::new()),
            token: token.clone(),
            clock: clock.clone(),
            events: events.clone(),
            config: RegistryConfig::new(registry_id),
        })?;
        info!(
            registry = %registry_id.short(),
            mint = %stake_mint.short(),
            epoch = initial_epoch,
            "ledger created"
        );
        Ok(Self {
            service,
            token,
            clock,
            events,
            registry_id,
            state: Mutex::new(LedgerState::default()),
        })
    }

    pub fn from_config(config: &NodeConfig) -> Result<Self, LedgerError> {
        Self::new(config.registry_id, config.stake_mint, config.initial_epoch)
    }

    /// Fund genesis accounts and move the clock to the genesis epoch.
    ///
    /// Only valid before the first committed transaction, and the epoch may
    /// only move forward. Nothing is credited unless the whole config is valid.
    pub fn apply_genesis(&self, genesis: &GenesisConfig) -> Result<(), LedgerError> {
        let state = self.state.lock();
        if state.height > 0 {
            return Err(LedgerError::GenesisAfterTransactions(state.height));
        }
        genesis.validate()?;
        if let Some(epoch) = genesis.epoch {
            let current = self.clock.current_epoch();
            if epoch < current {
                return Err(LedgerError::EpochRewind {
                    genesis: epoch,
                    current,
                });
            }
            self.clock.advance_to(epoch);
        }
        for balance in &genesis.balances {
            self.token.mint_to(&balance.account, balance.amount)?;
        }
        info!(
            accounts = genesis.balances.len(),
            supply = self.token.total_supply(),
            epoch = self.clock.current_epoch(),
            "genesis applied"
        );
        Ok(())
    }

    /// Verify and execute one transaction.
    pub fn submit(&self, tx: SignedInstruction) -> Result<TransactionReceipt, LedgerError> {
        let mut state = self.state.lock();
        if let Err(err) = tx.verify(&self.registry_id) {
            warn!(signer = %tx.signer.short(), instruction = tx.instruction.name(), error = %err, "transaction signature rejected");
            return Err(err);
        }
        let expected = state.nonces.get(&tx.signer).copied().unwrap_or(0);
        if tx.nonce != expected {
            warn!(signer = %tx.signer.short(), expected, actual = tx.nonce, "stale nonce");
            return Err(LedgerError::StaleNonce {
                signer: tx.signer,
                expected,
                actual: tx.nonce,
            });
        }
        state.nonces.insert(tx.signer, expected.saturating_add(1));

        let SignedInstruction {
            signer,
            instruction,
            ..
        } = tx;
        let name = instruction.name();
        let events = self.service.execute(&signer, instruction)?;

        state.height += 1;
        info!(
            sequence = state.height,
            instruction = name,
            signer = %signer.short(),
            events = events.len(),
            "transaction committed"
        );
        Ok(TransactionReceipt {
            sequence: state.height,
            instruction: name.to_string(),
            signer,
            events,
        })
    }

    /// Move the external epoch counter forward.
    pub fn advance_epoch(&self, epochs: Epoch) -> Epoch {
        let _state = self.state.lock();
        let epoch = self.clock.advance(epochs);
        info!(epoch, "epoch advanced");
        epoch
    }

    pub fn current_epoch(&self) -> Epoch {
        self.clock.current_epoch()
    }

    pub fn height(&self) -> u64 {
        self.state.lock().height
    }

    /// Nonce the next transaction from `signer` must carry.
    pub fn next_nonce(&self, signer: &Pubkey) -> u64 {
        self.state.lock().nonces.get(signer).copied().unwrap_or(0)
    }

    pub fn registry_id(&self) -> Pubkey {
        self.registry_id
    }

    pub fn stake_mint(&self) -> Pubkey {
        self.token.mint()
    }

    pub fn balance(&self, account: &Pubkey) -> TokenAmount {
        self.token.balance(account)
    }

    /// Canonical slot of a logical key, as a client would derive it.
    pub fn slot_for(&self, key: &RecordKey) -> Result<SlotRef, LedgerError> {
        Ok(self.service.slot_for(key)?)
    }

    /// Raw record bytes at `slot`.
    pub fn record_bytes(&self, slot: &SlotAddress) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.service.record_bytes(slot)?)
    }

    /// Every event published so far, oldest first.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.events()
    }

    pub fn service(&self) -> &LedgerService {
        &self.service
    }
}

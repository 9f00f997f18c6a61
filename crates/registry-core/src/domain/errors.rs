use super::{CaseId, Denial, ReporterStatus, SlotAddress, SlotKind};
use shared_types::{Epoch, TokenAmount};
use thiserror::Error;

/// Every way a registry operation can be rejected.
///
/// All variants are returned before anything is committed; a failed
/// operation leaves every record exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Slot absent, holding a different record kind, or referenced with the
    /// wrong seeds/nonce.
    #[error("Slot {slot} is not a {expected:?} record of this registry")]
    Ownership { slot: SlotAddress, expected: SlotKind },

    #[error("Slot {slot} is already initialized")]
    DuplicateInitialization { slot: SlotAddress },

    #[error("Invalid reporter status: {status}")]
    InvalidReporterStatus { status: ReporterStatus },

    #[error("Unauthorized: {0}")]
    Unauthorized(Denial),

    #[error("Non-sequential case id: expected {expected}, got {actual}")]
    SequenceMismatch { expected: CaseId, actual: CaseId },

    #[error("Insufficient stake: required {required}, available {available}")]
    InsufficientStake {
        required: TokenAmount,
        available: TokenAmount,
    },

    #[error("Community mismatched")]
    CommunityMismatch,

    #[error("Network mismatched")]
    NetworkMismatch,

    #[error("Case mismatched")]
    CaseMismatch,

    #[error("Case {case_id} is closed")]
    CaseClosed { case_id: CaseId },

    #[error("Reporter is frozen")]
    FrozenReporter,

    #[error("Release epoch {unlock_epoch} is in the future (current {current_epoch})")]
    ReleaseEpochInFuture {
        unlock_epoch: Epoch,
        current_epoch: Epoch,
    },

    #[error("Risk score {0} outside 0..=10")]
    RiskOutOfRange(u8),

    #[error("Stake token is not the community stake mint")]
    InvalidMint,

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid seeds: {0}")]
    InvalidSeeds(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Corrupt record at {slot}: {reason}")]
    CorruptRecord { slot: SlotAddress, reason: String },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Token error: {0}")]
    Token(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

//! # Registry Core - Authorization and Lifecycle
//!
//! Ledger-anchored reputation registry: communities keep lists of staked
//! reporters who publish risk classifications for external-chain addresses
//! and assets, grouped into sequentially numbered cases.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | One slot per logical key, off-curve, registry-namespaced | `domain/slots.rs` - `SlotDeriver::derive()` |
//! | Created at most once per key | `service/mod.rs` - `claim()`, `adapters/memory_store.rs` - `commit()` |
//! | Referenced slots carry the creation nonce | `service/mod.rs` - `load()` |
//! | Reporter status only Inactive → Active → Unstaking → Inactive | `domain/lifecycle.rs` |
//! | Guarded writes require an `Authorized` token | `domain/guard.rs`, `service/mod.rs` - `commit_authorized()` |
//! | Case ids are 1, 2, 3, ... per community | `domain/entities.rs` - `Community::next_case_id()` |
//! | Risk score in 0..=10 | `domain/entities.rs` - `RiskScore::new()` |
//! | Failed operations change nothing | `service/mod.rs` - `commit()` |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `RecordStore` | Durable record arena (replicated ledger state) |
//! | `StakeToken` | Collateral transfers into and out of custody |
//! | `EpochClock` | External monotonic epoch for cooldowns |
//! | `EventPublisher` | Post-commit notifications |
//!
//! ## Usage Example
//!
//! ```ignore
//! use registry_core::prelude::*;
//!
//! let service = RegistryService::new(deps)?;
//! let events = service.execute(&signer, Instruction::CreateCase(args))?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod events;
pub mod instruction;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{
        InMemoryEventLog, InMemoryRecordStore, InMemoryStakeToken, ManualEpochClock,
    };
    pub use crate::config::RegistryConfig;
    pub use crate::domain::{
        Action, AddressRecord, AssetId, AssetRecord, Case, CaseId, CaseStatus, Category,
        ChainAddress, Community, CommunityConfig, Confirmation, Denial, FixedName, Network,
        PermissionMatrix, Record, RecordKey, RegistryError, RegistryResult, Reporter,
        ReporterRole, ReporterStatus, RewardConfig, RiskScore, SlotAddress, SlotDeriver, SlotKind,
        SlotRef, StakeThresholds,
    };
    pub use crate::events::RegistryEvent;
    pub use crate::instruction::*;
    pub use crate::ports::{
        EpochClock, EventPublisher, RecordStore, RegistryApi, StakeToken, TokenError,
    };
    pub use crate::service::{RegistryDependencies, RegistryService};
}

pub use config::RegistryConfig;
pub use domain::{RegistryError, RegistryResult};
pub use service::{RegistryDependencies, RegistryService};

//! # Adapters
//!
//! In-memory implementations of the outbound ports, used by the node runtime
//! and the test suites.

pub mod clock;
pub mod event_log;
pub mod memory_store;
pub mod token;

pub use clock::ManualEpochClock;
pub use event_log::InMemoryEventLog;
pub use memory_store::InMemoryRecordStore;
pub use token::InMemoryStakeToken;

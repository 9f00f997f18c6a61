//! # Registry Node
//!
//! Runtime around the registry core.
//!
//! ## Modular Structure
//!
//! - `config` - environment-driven [`NodeConfig`]
//! - `telemetry` - tracing subscriber setup
//! - `genesis` - initial balances and epoch
//! - `ledger` - signed-transaction front end over the registry service
//! - `batch` - JSON batch replay used by the binary
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize tracing
//! 3. Validate configuration (registry id and stake mint must be set)
//! 4. Create the ledger and apply genesis
//! 5. Replay the batch file, logging every receipt

pub mod batch;
pub mod config;
pub mod genesis;
pub mod ledger;
pub mod telemetry;

pub use batch::{load_batch, replay, BatchEntry, BatchError, ReplaySummary};
pub use config::{ConfigError, NodeConfig};
pub use genesis::{GenesisBalance, GenesisConfig, GenesisError};
pub use ledger::{Ledger, LedgerError, LedgerService, SignedInstruction, TransactionReceipt};
pub use telemetry::{init_tracing, TelemetryError};

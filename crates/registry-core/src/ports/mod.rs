//! # Ports Layer
//!
//! - **Driving Ports (Inbound)**: `RegistryApi`
//! - **Driven Ports (Outbound)**: `RecordStore`, `StakeToken`, `EpochClock`,
//!   `EventPublisher`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;

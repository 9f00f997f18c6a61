//! # Shared Types Crate
//!
//! Primitive types shared by every Risk-Registry crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: principal keys, hashes, epochs and token
//!   amounts are defined once here.
//! - **Signer Identity**: a principal is an ed25519 verifying key; the only
//!   way to prove you are a principal is a signature checked by
//!   [`signing::verify`].

pub mod entities;
pub mod errors;
pub mod signing;

pub use entities::*;
pub use errors::*;
pub use signing::{Keypair, Signature};

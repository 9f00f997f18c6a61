//! # Risk-Registry Test Suite
//!
//! End-to-end tests that drive the registry through the signed ledger, the
//! same path a client transaction takes.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # World: ledger, funded principals, slot helpers
//! └── integration/
//!     ├── scenarios.rs  # Reporter lifecycle, cases, classifications
//!     └── adversarial.rs# Forged slots, replays, privilege escalation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p registry-tests
//! cargo test -p registry-tests integration::adversarial::
//! ```

#![allow(dead_code)]

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod integration;

//! # Error Types
//!
//! Errors shared across crates.

use thiserror::Error;

/// Errors from parsing or checking principal keys and signatures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Hex string could not be decoded.
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    /// Decoded key has the wrong length.
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Key bytes are not a valid ed25519 point.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Signature does not verify for the given key and message.
    #[error("Signature verification failed")]
    VerificationFailed,
}

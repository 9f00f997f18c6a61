//! Batch replay: a JSON array of epoch advances and signed transactions,
//! applied to a [`Ledger`] in order.

use crate::ledger::{Ledger, SignedInstruction};
use serde::{Deserialize, Serialize};
use shared_types::Epoch;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Failed to read batch file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse batch file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchEntry {
    AdvanceEpoch { epochs: Epoch },
    Transaction(SignedInstruction),
}

/// Counts from one replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub committed: usize,
    pub rejected: usize,
    pub final_epoch: Epoch,
}

pub fn load_batch(path: impl AsRef<Path>) -> Result<Vec<BatchEntry>, BatchError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Apply every entry; a rejected transaction is logged and skipped.
pub fn replay(ledger: &Ledger, entries: Vec<BatchEntry>) -> ReplaySummary {
    let mut summary = ReplaySummary::default();
    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            BatchEntry::AdvanceEpoch { epochs } => {
                ledger.advance_epoch(epochs);
            }
            BatchEntry::Transaction(tx) => {
                let instruction = tx.instruction.name();
                match ledger.submit(tx) {
                    Ok(receipt) => {
                        summary.committed += 1;
                        for event in &receipt.events {
                            info!(entry = index, sequence = receipt.sequence, event = event.name(), "receipt");
                        }
                    }
                    Err(err) => {
                        summary.rejected += 1;
                        warn!(entry = index, instruction, error = %err, "transaction failed");
                    }
                }
            }
        }
    }
    summary.final_epoch = ledger.current_epoch();
    summary
}

use crate::ports::EpochClock;
use shared_types::Epoch;
use std::sync::atomic::{AtomicU64, Ordering};

/// Epoch counter advanced explicitly by its owner.
#[derive(Debug, Default)]
pub struct ManualEpochClock {
    epoch: AtomicU64,
}

impl ManualEpochClock {
    pub fn new(epoch: Epoch) -> Self {
        Self {
            epoch: AtomicU64::new(epoch),
        }
    }

    /// Move forward to `epoch`; an earlier epoch leaves the clock as is.
    pub fn advance_to(&self, epoch: Epoch) -> Epoch {
        let previous = self.epoch.fetch_max(epoch, Ordering::SeqCst);
        previous.max(epoch)
    }

    /// Advance by `epochs` and return the new epoch.
    pub fn advance(&self, epochs: Epoch) -> Epoch {
        let previous = self
            .epoch
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |e| {
                Some(e.saturating_add(epochs))
            })
            .unwrap_or_else(|e| e);
        previous.saturating_add(epochs)
    }
}

impl EpochClock for ManualEpochClock {
    fn current_epoch(&self) -> Epoch {
        self.epoch.load(Ordering::SeqCst)
    }
}

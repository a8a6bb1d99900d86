//! Sources for the `observed_at` stamp on snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies the monotonically increasing counter a snapshot is observed at
/// (block height, wall-clock millis, replay step...).
pub trait SequenceSource: Send + Sync {
    fn current(&self) -> u64;
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClockSequence;

impl SequenceSource for WallClockSequence {
    fn current(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Counter that advances by one on every read, starting at `start`.
///
/// Useful for replays and tests where wall-clock time would make snapshots
/// non-reproducible.
#[derive(Debug, Default)]
pub struct CounterSequence {
    next: AtomicU64,
}

impl CounterSequence {
    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl SequenceSource for CounterSequence {
    fn current(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

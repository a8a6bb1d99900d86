//! Snapshot Collector
//!
//! Queries a [`MarketProvider`] for one configured market and turns the
//! answer into a [`MarketSnapshot`]. A failed query never reaches the caller:
//! it is replaced by [`MarketSnapshot::baseline`], so an unreachable or
//! not-yet-deployed provider cannot look like a price or volume shock.

use tracing::warn;

use crate::provider::MarketProvider;
use crate::sequence::SequenceSource;
use crate::types::{MarketSnapshot, SnapshotCodecError};

/// Where a collected snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Live,
    Baseline,
}

/// A snapshot plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub snapshot: MarketSnapshot,
    pub source: SnapshotSource,
}

pub struct SnapshotCollector<P, S> {
    market_id: String,
    provider: P,
    sequence: S,
}

impl<P: MarketProvider, S: SequenceSource> SnapshotCollector<P, S> {
    pub fn new(market_id: impl Into<String>, provider: P, sequence: S) -> Self {
        Self {
            market_id: market_id.into(),
            provider,
            sequence,
        }
    }

    pub fn market_id(&self) -> &str {
        &self.market_id
    }

    /// One provider query; baseline on any failure.
    pub async fn observe(&self) -> Observation {
        let result = self.provider.get_market(&self.market_id).await;
        let observed_at = self.sequence.current();

        match result {
            Ok(record) => Observation {
                snapshot: MarketSnapshot::from_record(record, observed_at),
                source: SnapshotSource::Live,
            },
            Err(e) => {
                warn!(
                    market_id = %self.market_id,
                    observed_at,
                    error = %e,
                    "provider query failed, substituting baseline snapshot"
                );
                Observation {
                    snapshot: MarketSnapshot::baseline(self.market_id.clone(), observed_at),
                    source: SnapshotSource::Baseline,
                }
            }
        }
    }

    pub async fn collect(&self) -> MarketSnapshot {
        self.observe().await.snapshot
    }

    /// Opaque encoding of [`collect`](Self::collect), as fed to the detector.
    pub async fn collect_encoded(&self) -> Result<Vec<u8>, SnapshotCodecError> {
        self.collect().await.encode()
    }
}

pub mod collector;
pub mod provider;
pub mod sequence;
pub mod types;

pub use collector::{Observation, SnapshotCollector, SnapshotSource};
pub use provider::{HttpMarketProvider, MarketProvider, ProviderError};
pub use sequence::{CounterSequence, SequenceSource, WallClockSequence};
pub use types::{
    BASELINE_VOLUME, MarketRecord, MarketSnapshot, PRICE_DENOMINATOR, SnapshotCodecError,
    TOKEN_UNIT,
};

pub mod client;
pub mod errors;
pub mod types;

use async_trait::async_trait;

use crate::types::MarketRecord;

pub use client::HttpMarketProvider;
pub use errors::ProviderError;

/// Read access to the current state of a market, keyed by identifier.
///
/// Implementations perform exactly one lookup per call; retry and cadence
/// belong to whoever drives the collector.
#[async_trait]
pub trait MarketProvider: Send + Sync {
    async fn get_market(&self, market_id: &str) -> Result<MarketRecord, ProviderError>;
}

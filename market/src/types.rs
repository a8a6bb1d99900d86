use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed-point scale for outcome prices: `1_000_000` == probability 1.0.
pub const PRICE_DENOMINATOR: u64 = 1_000_000;

/// One whole outcome token in base units (18 decimals).
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Cumulative volume reported by the baseline snapshot (1,000 whole tokens).
///
/// Non-zero so that a baseline used as "previous" still passes the volume
/// rule's zero guard the same way a live snapshot would.
pub const BASELINE_VOLUME: u128 = 1_000 * TOKEN_UNIT;

/// Market fields as returned by a provider, before sequencing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRecord {
    pub market_id: String,
    pub yes_price: u64,
    pub no_price: u64,
    pub total_volume: u128,
    pub last_trader: Option<String>,
    pub last_trade_size: u128,
}

/// Point-in-time observation of one two-outcome market.
///
/// Prices are scaled by [`PRICE_DENOMINATOR`]; volumes are in base token units.
/// Nothing here is validated: a healthy market keeps `yes + no == denominator`
/// and a non-decreasing `total_volume`, but callers must treat both as
/// attacker-controlled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub market_id: String,
    pub yes_price: u64,
    pub no_price: u64,
    pub total_volume: u128,
    #[serde(default)]
    pub last_trader: Option<String>,
    pub last_trade_size: u128,
    pub observed_at: u64,
}

#[derive(Error, Debug)]
pub enum SnapshotCodecError {
    #[error("empty snapshot encoding")]
    Empty,

    #[error("malformed snapshot encoding: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl MarketSnapshot {
    /// Stamp a provider record with the sequence value it was observed at.
    pub fn from_record(record: MarketRecord, observed_at: u64) -> Self {
        Self {
            market_id: record.market_id,
            yes_price: record.yes_price,
            no_price: record.no_price,
            total_volume: record.total_volume,
            last_trader: record.last_trader,
            last_trade_size: record.last_trade_size,
            observed_at,
        }
    }

    /// Neutral stand-in used when live data is unavailable.
    ///
    /// Balanced prices, no last trade, [`BASELINE_VOLUME`]. Two baselines never
    /// differ in anything the detection rules look at.
    pub fn baseline(market_id: impl Into<String>, observed_at: u64) -> Self {
        Self {
            market_id: market_id.into(),
            yes_price: PRICE_DENOMINATOR / 2,
            no_price: PRICE_DENOMINATOR / 2,
            total_volume: BASELINE_VOLUME,
            last_trader: None,
            last_trade_size: 0,
            observed_at,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, SnapshotCodecError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotCodecError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(SnapshotCodecError::Empty);
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

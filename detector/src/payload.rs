use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Alert handed to the response sink when a transition looks manipulated.
///
/// Self-contained: everything is copied out of the two snapshots, and the
/// same fields are filled whichever rule fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertPayload {
    pub market_id: String,

    /// Counterparty of the current snapshot's last trade, if any.
    pub trader: Option<String>,

    /// Current snapshot's last trade size, base token units.
    pub trade_size: u128,

    pub yes_price_delta: u64,
    pub no_price_delta: u64,

    /// Signed change in total volume (current - previous).
    pub volume_delta: i128,
}

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("empty alert payload")]
    Empty,

    #[error("alert payload codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl AlertPayload {
    pub fn encode(&self) -> Result<Vec<u8>, PayloadError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.is_empty() {
            return Err(PayloadError::Empty);
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

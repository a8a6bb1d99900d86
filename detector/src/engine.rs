//! Decision Engine
//!
//! Pure, stateless verdict over an ordered `(current, previous)` snapshot
//! pair. The engine is an immutable value: clone it or share it behind an
//! `Arc` across any number of callers; identical inputs always produce
//! identical outputs.
//!
//! Degenerate input (missing history, empty or unparseable encodings) is not
//! an error. It resolves to [`Decision::Clear`].

use market::MarketSnapshot;

use crate::payload::{AlertPayload, PayloadError};
use crate::rules::{TriggerRule, fired_rules, price_deltas, volume_delta};
use crate::thresholds::Thresholds;

/// Verdict for one snapshot pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Clear,
    Anomaly {
        payload: AlertPayload,
        /// Rules that fired, cheapest first. Not part of the wire payload.
        rules: Vec<TriggerRule>,
    },
}

/// Wire form of a [`Decision`]: trigger flag plus encoded payload
/// (empty when not triggered).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    pub triggered: bool,
    pub payload: Vec<u8>,
}

impl Decision {
    pub fn is_triggered(&self) -> bool {
        matches!(self, Decision::Anomaly { .. })
    }

    pub fn payload(&self) -> Option<&AlertPayload> {
        match self {
            Decision::Clear => None,
            Decision::Anomaly { payload, .. } => Some(payload),
        }
    }

    pub fn to_response(&self) -> Result<Response, PayloadError> {
        match self {
            Decision::Clear => Ok(Response::default()),
            Decision::Anomaly { payload, .. } => Ok(Response {
                triggered: true,
                payload: payload.encode()?,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionEngine {
    thresholds: Thresholds,
    market_id: String,
}

impl DecisionEngine {
    /// `market_id` is reported in alerts whose current snapshot carries none.
    pub fn new(thresholds: Thresholds, market_id: impl Into<String>) -> Self {
        Self {
            thresholds,
            market_id: market_id.into(),
        }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn market_id(&self) -> &str {
        &self.market_id
    }

    /// Evaluate encoded snapshots, newest first.
    ///
    /// Only `data[0]` (current) and `data[1]` (previous) are read. Fewer than
    /// two elements, or either of them empty/unparseable, yields a
    /// non-triggering response. The only error is a failure to encode the
    /// alert payload.
    pub fn should_respond<B: AsRef<[u8]>>(&self, data: &[B]) -> Result<Response, PayloadError> {
        self.decide(data).to_response()
    }

    /// Same as [`should_respond`](Self::should_respond) but keeps the typed decision.
    pub fn decide<B: AsRef<[u8]>>(&self, data: &[B]) -> Decision {
        let [current, previous, ..] = data else {
            return Decision::Clear;
        };

        let (Ok(current), Ok(previous)) = (
            MarketSnapshot::decode(current.as_ref()),
            MarketSnapshot::decode(previous.as_ref()),
        ) else {
            return Decision::Clear;
        };

        self.evaluate(&current, &previous)
    }

    /// Apply the three rules to decoded snapshots.
    pub fn evaluate(&self, current: &MarketSnapshot, previous: &MarketSnapshot) -> Decision {
        let (yes_delta, no_delta) = price_deltas(current, previous);

        let rules = fired_rules(&self.thresholds, current, previous, yes_delta, no_delta);
        if rules.is_empty() {
            return Decision::Clear;
        }

        let market_id = if current.market_id.is_empty() {
            self.market_id.clone()
        } else {
            current.market_id.clone()
        };

        Decision::Anomaly {
            payload: AlertPayload {
                market_id,
                trader: current.last_trader.clone(),
                trade_size: current.last_trade_size,
                yes_price_delta: yes_delta,
                no_price_delta: no_delta,
                volume_delta: volume_delta(current.total_volume, previous.total_volume),
            },
            rules,
        }
    }
}

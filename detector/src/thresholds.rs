use market::{PRICE_DENOMINATOR, TOKEN_UNIT};

/// Detection thresholds, fixed when the engine is built.
///
/// Fields are private and there are no setters: a deployed engine answers the
/// same way for the same snapshot pair for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    price_delta: u64,
    volume_spike_percent: u128,
    single_trade: u128,
}

impl Thresholds {
    /// 20% of the price denominator.
    pub const DEFAULT_PRICE_DELTA: u64 = PRICE_DENOMINATOR / 5;

    /// Percentage *increase* over the previous volume; 400 flags anything
    /// beyond +400% (more than 5x the previous total).
    pub const DEFAULT_VOLUME_SPIKE_PERCENT: u128 = 400;

    /// 10,000 whole tokens.
    pub const DEFAULT_SINGLE_TRADE: u128 = 10_000 * TOKEN_UNIT;

    pub const fn new(price_delta: u64, volume_spike_percent: u128, single_trade: u128) -> Self {
        Self {
            price_delta,
            volume_spike_percent,
            single_trade,
        }
    }

    /// Largest tolerated |Δprice| per outcome, in denominator units.
    pub const fn price_delta(&self) -> u64 {
        self.price_delta
    }

    pub const fn volume_spike_percent(&self) -> u128 {
        self.volume_spike_percent
    }

    /// Largest tolerated single trade, in base token units.
    pub const fn single_trade(&self) -> u128 {
        self.single_trade
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_PRICE_DELTA,
            Self::DEFAULT_VOLUME_SPIKE_PERCENT,
            Self::DEFAULT_SINGLE_TRADE,
        )
    }
}

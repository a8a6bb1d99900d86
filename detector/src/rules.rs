//! The three trigger rules and the arithmetic they share.
//!
//! Every helper here is total: no subtraction can underflow and no division
//! can see a zero divisor.

use market::MarketSnapshot;

use crate::thresholds::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerRule {
    LargeTrade,
    PriceSwing,
    VolumeSpike,
}

impl TriggerRule {
    pub fn label(&self) -> &'static str {
        match self {
            TriggerRule::LargeTrade => "LargeTrade",
            TriggerRule::PriceSwing => "PriceSwing",
            TriggerRule::VolumeSpike => "VolumeSpike",
        }
    }
}

/// Absolute YES / NO price moves between two snapshots. Order-independent.
pub fn price_deltas(current: &MarketSnapshot, previous: &MarketSnapshot) -> (u64, u64) {
    (
        current.yes_price.abs_diff(previous.yes_price),
        current.no_price.abs_diff(previous.no_price),
    )
}

/// Truncated percentage growth of total volume, `(current - previous) * 100 / previous`.
///
/// `None` when the previous volume is zero or volume did not grow. Exact for
/// every pair of `u128` volumes; only a result above `u128::MAX` saturates.
pub fn volume_increase_percent(current: u128, previous: u128) -> Option<u128> {
    if previous == 0 || current <= previous {
        return None;
    }
    let growth = current - previous;
    let whole = (growth / previous).saturating_mul(100);
    let fraction = mul_div_floor(growth % previous, 100, previous);

    Some(whole.saturating_add(fraction))
}

/// `floor(a * b / m)` for `a < m`, without forming `a * b`.
///
/// Shift-and-add over the bits of `b`, keeping the running remainder below
/// `m` so no intermediate exceeds `u128::MAX`.
fn mul_div_floor(a: u128, b: u128, m: u128) -> u128 {
    debug_assert!(a < m);

    let mut quotient: u128 = 0;
    let mut rem: u128 = 0;

    for bit in (0..u128::BITS - b.leading_zeros()).rev() {
        // rem = 2 * rem (mod m)
        quotient = quotient.saturating_mul(2);
        if rem >= m - rem {
            rem -= m - rem;
            quotient = quotient.saturating_add(1);
        } else {
            rem += rem;
        }

        if (b >> bit) & 1 == 1 {
            // rem = rem + a (mod m)
            if rem >= m - a {
                rem -= m - a;
                quotient = quotient.saturating_add(1);
            } else {
                rem += a;
            }
        }
    }

    quotient
}

/// Signed `current - previous`, clamped to the `i128` range.
pub fn volume_delta(current: u128, previous: u128) -> i128 {
    if current >= previous {
        i128::try_from(current - previous).unwrap_or(i128::MAX)
    } else {
        i128::try_from(previous - current).map_or(i128::MIN, |d| -d)
    }
}

/// Rules that fire for `(current, previous)`, cheapest first.
///
/// `yes_delta` / `no_delta` come from [`price_deltas`] so callers compute
/// them once.
pub fn fired_rules(
    thresholds: &Thresholds,
    current: &MarketSnapshot,
    previous: &MarketSnapshot,
    yes_delta: u64,
    no_delta: u64,
) -> Vec<TriggerRule> {
    let mut fired = Vec::new();

    if current.last_trade_size > thresholds.single_trade() {
        fired.push(TriggerRule::LargeTrade);
    }

    if yes_delta > thresholds.price_delta() || no_delta > thresholds.price_delta() {
        fired.push(TriggerRule::PriceSwing);
    }

    if volume_increase_percent(current.total_volume, previous.total_volume)
        .is_some_and(|pct| pct > thresholds.volume_spike_percent())
    {
        fired.push(TriggerRule::VolumeSpike);
    }

    fired
}

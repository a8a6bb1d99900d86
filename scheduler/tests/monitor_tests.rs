use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing_test::traced_test;

use detector::{AlertPayload, DecisionEngine, Thresholds, TriggerRule};
use executor::{AlertSink, MarketGuard, ResponseAction, ResponseExecutor};
use market::{
    CounterSequence, MarketRecord, PRICE_DENOMINATOR, ProviderError, SnapshotCollector,
    SnapshotSource, TOKEN_UNIT,
};
use scheduler::{Counters, Monitor};

use mock_provider::ScriptedProvider;

const MARKET: &str = "fed-cut-december";

fn record(yes_price: u64, total_volume: u128, trade: u128) -> MarketRecord {
    MarketRecord {
        market_id: MARKET.into(),
        yes_price,
        no_price: PRICE_DENOMINATOR - yes_price,
        total_volume,
        last_trader: Some("0xtrader".into()),
        last_trade_size: trade,
    }
}

fn quiet() -> MarketRecord {
    record(550_000, 100_000 * TOKEN_UNIT, 50 * TOKEN_UNIT)
}

#[derive(Default)]
struct RecordingSink {
    alerts: Mutex<Vec<AlertPayload>>,
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn on_alert(&self, alert: &AlertPayload) -> anyhow::Result<()> {
        self.alerts.lock().await.push(alert.clone());
        Ok(())
    }
}

struct RejectingSink;

#[async_trait]
impl AlertSink for RejectingSink {
    async fn on_alert(&self, _alert: &AlertPayload) -> anyhow::Result<()> {
        anyhow::bail!("pager offline")
    }
}

fn monitor(
    provider: &ScriptedProvider,
    sink: Arc<dyn AlertSink>,
) -> Monitor<ScriptedProvider, CounterSequence> {
    let collector =
        SnapshotCollector::new(MARKET, provider.clone(), CounterSequence::starting_at(1));
    let engine = DecisionEngine::new(Thresholds::default(), MARKET);
    Monitor::new(collector, engine, sink, Counters::default())
}

#[tokio::test]
async fn first_tick_never_triggers() -> anyhow::Result<()> {
    let provider = ScriptedProvider::new();
    provider
        .push_ok(record(550_000, 100_000 * TOKEN_UNIT, 50_000 * TOKEN_UNIT))
        .await;

    let sink = Arc::new(RecordingSink::default());
    let mut m = monitor(&provider, sink.clone());

    let outcome = m.tick().await?;

    assert!(!outcome.triggered);
    assert!(!outcome.delivered);
    assert!(outcome.rules.is_empty());
    assert_eq!(outcome.source, SnapshotSource::Live);
    assert!(m.previous().is_some());
    assert!(sink.alerts.lock().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn large_trade_on_second_tick_is_delivered() -> anyhow::Result<()> {
    let provider = ScriptedProvider::new();
    provider.push_ok(quiet()).await;
    provider
        .push_ok(record(550_000, 115_000 * TOKEN_UNIT, 15_000 * TOKEN_UNIT))
        .await;

    let sink = Arc::new(RecordingSink::default());
    let mut m = monitor(&provider, sink.clone());

    assert!(!m.tick().await?.triggered);
    let outcome = m.tick().await?;

    assert!(outcome.triggered);
    assert!(outcome.delivered);
    assert_eq!(outcome.rules, vec![TriggerRule::LargeTrade]);
    assert_eq!(outcome.observed_at, 2);

    let alerts = sink.alerts.lock().await;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].market_id, MARKET);
    assert_eq!(alerts[0].trader.as_deref(), Some("0xtrader"));
    assert_eq!(alerts[0].trade_size, 15_000 * TOKEN_UNIT);
    assert_eq!(alerts[0].yes_price_delta, 0);
    assert_eq!(alerts[0].volume_delta, (15_000 * TOKEN_UNIT) as i128);

    assert_eq!(Counters::get(&m.counters().ticks), 2);
    assert_eq!(Counters::get(&m.counters().alerts), 1);

    Ok(())
}

#[tokio::test]
async fn comparison_uses_only_the_last_snapshot() -> anyhow::Result<()> {
    // 600k → 700k → 850k: each step is 100k/150k, under the 200k threshold.
    let provider = ScriptedProvider::new();
    for yes in [600_000, 700_000, 850_000] {
        provider.push_ok(record(yes, 100_000 * TOKEN_UNIT, 0)).await;
    }

    let sink = Arc::new(RecordingSink::default());
    let mut m = monitor(&provider, sink.clone());

    for _ in 0..3 {
        assert!(!m.tick().await?.triggered);
    }
    assert!(sink.alerts.lock().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn provider_outage_falls_back_to_baseline() -> anyhow::Result<()> {
    let provider = ScriptedProvider::new();
    provider.push_err(ProviderError::Unavailable("down".into())).await;
    provider
        .push_err(ProviderError::MarketNotFound(MARKET.into()))
        .await;

    let sink = Arc::new(RecordingSink::default());
    let mut m = monitor(&provider, sink.clone());

    let first = m.tick().await?;
    let second = m.tick().await?;

    assert_eq!(first.source, SnapshotSource::Baseline);
    assert_eq!(second.source, SnapshotSource::Baseline);
    assert!(!second.triggered);
    assert_eq!(provider.call_count(), 2);
    assert_eq!(Counters::get(&m.counters().baseline_fallbacks), 2);
    assert!(sink.alerts.lock().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn sink_failure_is_counted_not_propagated() -> anyhow::Result<()> {
    let provider = ScriptedProvider::new();
    provider.push_ok(quiet()).await;
    provider.push_ok(record(900_000, 100_000 * TOKEN_UNIT, 0)).await;

    let mut m = monitor(&provider, Arc::new(RejectingSink));

    m.tick().await?;
    let outcome = m.tick().await?;

    assert!(outcome.triggered);
    assert!(!outcome.delivered);
    assert_eq!(outcome.rules, vec![TriggerRule::PriceSwing]);
    assert_eq!(Counters::get(&m.counters().sink_failures), 1);
    assert_eq!(Counters::get(&m.counters().alerts), 1);

    Ok(())
}

#[tokio::test]
async fn pause_response_flips_guard_on_anomaly() -> anyhow::Result<()> {
    let provider = ScriptedProvider::new();
    provider.push_ok(quiet()).await;
    provider
        .push_ok(record(550_000, 700_000 * TOKEN_UNIT, 0))
        .await;

    let guard = MarketGuard::new();
    let exec = ResponseExecutor::new(ResponseAction::Pause, guard.clone());
    let mut m = monitor(&provider, Arc::new(exec));

    m.tick().await?;
    assert!(!guard.is_paused());

    let outcome = m.tick().await?;
    assert_eq!(outcome.rules, vec![TriggerRule::VolumeSpike]);
    assert!(guard.is_paused());

    Ok(())
}

#[tokio::test]
#[traced_test]
async fn anomaly_is_logged() -> anyhow::Result<()> {
    let provider = ScriptedProvider::new();
    provider.push_ok(quiet()).await;
    provider
        .push_ok(record(550_000, 100_000 * TOKEN_UNIT, 20_000 * TOKEN_UNIT))
        .await;

    let mut m = monitor(&provider, Arc::new(RecordingSink::default()));
    m.tick().await?;
    m.tick().await?;

    assert!(logs_contain("anomaly detected"));
    assert!(logs_contain("LargeTrade"));

    Ok(())
}

#[tokio::test]
async fn run_stops_on_shutdown() {
    let provider = ScriptedProvider::new();
    let m = monitor(&provider, Arc::new(RecordingSink::default()));

    let counters = m
        .run(
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_millis(60)),
        )
        .await;

    assert!(Counters::get(&counters.ticks) >= 1);
    assert_eq!(
        Counters::get(&counters.ticks),
        Counters::get(&counters.baseline_fallbacks)
    );
    assert_eq!(Counters::get(&counters.alerts), 0);
    assert_eq!(provider.call_count() as u64, Counters::get(&counters.ticks));
}

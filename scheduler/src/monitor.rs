//! Monitor loop
//!
//! Drives one market through the detector on a fixed cadence:
//!
//! Provider → Collector → (current, previous) → DecisionEngine → AlertSink
//!
//! The monitor is the only place that remembers anything between cycles, and
//! it keeps exactly one encoded snapshot: the previous tick's.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{Instrument, debug, error, field, info, warn};

use common::{TraceId, child_span, root_span};
use detector::{Decision, DecisionEngine, TriggerRule};
use executor::{AlertSink, deliver};
use market::{MarketProvider, SequenceSource, SnapshotCollector, SnapshotSource};

use crate::counters::Counters;

/// What happened during one [`Monitor::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub observed_at: u64,
    pub source: SnapshotSource,
    pub triggered: bool,
    pub rules: Vec<TriggerRule>,
    /// The sink accepted the alert. `false` when nothing triggered.
    pub delivered: bool,
}

pub struct Monitor<P, S> {
    collector: SnapshotCollector<P, S>,
    engine: DecisionEngine,
    sink: Arc<dyn AlertSink>,
    previous: Option<Vec<u8>>,
    counters: Counters,
}

impl<P: MarketProvider, S: SequenceSource> Monitor<P, S> {
    pub fn new(
        collector: SnapshotCollector<P, S>,
        engine: DecisionEngine,
        sink: Arc<dyn AlertSink>,
        counters: Counters,
    ) -> Self {
        Self {
            collector,
            engine,
            sink,
            previous: None,
            counters,
        }
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Encoded snapshot retained from the last tick, if any.
    pub fn previous(&self) -> Option<&[u8]> {
        self.previous.as_deref()
    }

    /// Collect one snapshot, compare it with the previous one and alert if needed.
    pub async fn tick(&mut self) -> anyhow::Result<TickOutcome> {
        let trace_id = TraceId::new();
        let span = root_span("monitor_tick", &trace_id);
        span.record("market_id", field::display(self.collector.market_id()));

        self.tick_inner().instrument(span).await
    }

    async fn tick_inner(&mut self) -> anyhow::Result<TickOutcome> {
        Counters::incr(&self.counters.ticks);

        let observation = self
            .collector
            .observe()
            .instrument(child_span("collect"))
            .await;
        if observation.source == SnapshotSource::Baseline {
            Counters::incr(&self.counters.baseline_fallbacks);
        }

        let current = observation
            .snapshot
            .encode()
            .context("failed to encode snapshot")?;

        let mut history: Vec<&[u8]> = vec![current.as_slice()];
        if let Some(previous) = self.previous.as_deref() {
            history.push(previous);
        }

        let decision = self.engine.decide(&history);
        let response = decision
            .to_response()
            .context("failed to encode alert payload")?;

        let rules = match &decision {
            Decision::Clear => Vec::new(),
            Decision::Anomaly { rules, .. } => rules.clone(),
        };

        let mut delivered = false;
        if response.triggered {
            Counters::incr(&self.counters.alerts);

            let labels: Vec<&str> = rules.iter().map(TriggerRule::label).collect();
            warn!(
                observed_at = observation.snapshot.observed_at,
                rules = ?labels,
                "anomaly detected"
            );

            match deliver(self.sink.as_ref(), &response.payload)
                .instrument(child_span("respond"))
                .await
            {
                Ok(_) => delivered = true,
                Err(e) => {
                    Counters::incr(&self.counters.sink_failures);
                    error!(error = %e, "alert delivery failed");
                }
            }
        } else {
            debug!(
                observed_at = observation.snapshot.observed_at,
                has_previous = self.previous.is_some(),
                "no anomaly"
            );
        }

        self.previous = Some(current);

        Ok(TickOutcome {
            observed_at: observation.snapshot.observed_at,
            source: observation.source,
            triggered: response.triggered,
            rules,
            delivered,
        })
    }

    /// Tick every `every` until `shutdown` resolves; returns the counters.
    pub async fn run<F>(mut self, every: Duration, shutdown: F) -> Counters
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            market_id = %self.collector.market_id(),
            every_ms = millis(every),
            "monitor started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        error!(error = ?e, "monitor tick failed");
                    }
                }
            }
        }

        info!(
            ticks = Counters::get(&self.counters.ticks),
            alerts = Counters::get(&self.counters.alerts),
            baseline_fallbacks = Counters::get(&self.counters.baseline_fallbacks),
            sink_failures = Counters::get(&self.counters.sink_failures),
            "monitor stopped"
        );

        self.counters
    }
}

/// Whole milliseconds, clamped to `u64`.
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc::Receiver;
use tracing::{info, warn};

use common::init_logger;
use detector::{AlertPayload, DecisionEngine};
use executor::{AlertSink, MarketGuard, ResponseAction, ResponseExecutor};
use market::{HttpMarketProvider, SnapshotCollector, WallClockSequence};
use scheduler::{AppConfig, Counters, Monitor};

/// Builds the response executor for the configured action. For `notify`,
/// also spawns the consumer that drains the notification channel.
fn start_response_executor(cfg: &AppConfig, guard: MarketGuard) -> Arc<dyn AlertSink> {
    if cfg.response_action != ResponseAction::Notify {
        return Arc::new(ResponseExecutor::new(cfg.response_action, guard));
    }

    let (exec, rx) = ResponseExecutor::with_notifier(cfg.response_action, guard, cfg.notify_capacity);
    tokio::spawn(drain_notifications(rx));
    Arc::new(exec)
}

async fn drain_notifications(mut rx: Receiver<AlertPayload>) {
    while let Some(alert) = rx.recv().await {
        info!(
            component = "notifier",
            market_id = %alert.market_id,
            trade_size = %alert.trade_size,
            "alert notification"
        );
    }
    warn!(component = "notifier", "notification channel closed");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("invalid configuration")?;
    init_logger("watchdog", cfg.json_logs);

    info!(
        market_id = %cfg.market_id,
        provider = %cfg.provider_url,
        price_delta = cfg.thresholds.price_delta(),
        volume_spike_percent = %cfg.thresholds.volume_spike_percent(),
        single_trade = %cfg.thresholds.single_trade(),
        action = %cfg.response_action,
        "starting watchdog"
    );

    let provider = HttpMarketProvider::new(cfg.provider_url.clone())
        .context("failed to build provider client")?;
    let collector = SnapshotCollector::new(cfg.market_id.clone(), provider, WallClockSequence);
    let engine = DecisionEngine::new(cfg.thresholds, cfg.market_id.clone());

    let guard = MarketGuard::new();
    let sink = start_response_executor(&cfg, guard.clone());

    let monitor = Monitor::new(collector, engine, sink, Counters::default());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = ?e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    monitor.run(cfg.poll_interval, shutdown).await;

    if guard.is_paused() {
        warn!(market_id = %cfg.market_id, "exiting with market paused");
    }

    Ok(())
}

//! Response executor for anomaly alerts.
//!
//! Every alert is recorded at `warn` level first; the configured
//! [`ResponseAction`] runs afterwards. A failing action never un-records
//! the alert.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::{info, warn};

use detector::AlertPayload;

use crate::sink::AlertSink;
use crate::types::{ResponseAction, ResponseError};

/// Shared pause switch for the monitored market.
///
/// Cheap to clone; every clone observes the same flag.
#[derive(Clone, Debug, Default)]
pub struct MarketGuard {
    paused: Arc<AtomicBool>,
}

impl MarketGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Returns `true` if this call changed the state.
    pub fn pause(&self) -> bool {
        !self.paused.swap(true, Ordering::SeqCst)
    }

    /// Returns `true` if this call changed the state.
    pub fn resume(&self) -> bool {
        self.paused.swap(false, Ordering::SeqCst)
    }
}

pub struct ResponseExecutor {
    action: ResponseAction,
    guard: MarketGuard,
    notify_tx: Option<Sender<AlertPayload>>,
}

impl ResponseExecutor {
    pub fn new(action: ResponseAction, guard: MarketGuard) -> Self {
        Self {
            action,
            guard,
            notify_tx: None,
        }
    }

    /// Executor with a bounded notification channel; returns the receiving end.
    pub fn with_notifier(
        action: ResponseAction,
        guard: MarketGuard,
        capacity: usize,
    ) -> (Self, Receiver<AlertPayload>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                action,
                guard,
                notify_tx: Some(tx),
            },
            rx,
        )
    }

    pub fn action(&self) -> ResponseAction {
        self.action
    }

    pub fn guard(&self) -> &MarketGuard {
        &self.guard
    }

    fn notify(&self, alert: &AlertPayload) -> Result<(), ResponseError> {
        let tx = self.notify_tx.as_ref().ok_or(ResponseError::NoNotifier)?;

        // Never block the monitor on a slow consumer.
        tx.try_send(alert.clone()).map_err(|e| match e {
            TrySendError::Full(_) => ResponseError::NotifierFull,
            TrySendError::Closed(_) => ResponseError::NotifierClosed,
        })
    }
}

#[async_trait]
impl AlertSink for ResponseExecutor {
    async fn on_alert(&self, alert: &AlertPayload) -> anyhow::Result<()> {
        warn!(
            component = "response",
            event = "anomaly",
            market_id = %alert.market_id,
            trader = alert.trader.as_deref().unwrap_or("-"),
            trade_size = %alert.trade_size,
            yes_price_delta = alert.yes_price_delta,
            no_price_delta = alert.no_price_delta,
            volume_delta = %alert.volume_delta,
            action = %self.action,
            "manipulation alert"
        );

        match self.action {
            ResponseAction::Log => {}
            ResponseAction::Pause => {
                if self.guard.pause() {
                    warn!(market_id = %alert.market_id, "market paused");
                } else {
                    info!(market_id = %alert.market_id, "market already paused");
                }
            }
            ResponseAction::Notify => self.notify(alert)?,
        }

        Ok(())
    }
}

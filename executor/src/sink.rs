use async_trait::async_trait;

use detector::AlertPayload;

use crate::types::DeliveryError;

/// Receiver of anomaly alerts.
///
/// Implementations perform side effects (logging, pausing, notifying). The
/// detector never looks at what they return; the monitor only logs failures.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn on_alert(&self, alert: &AlertPayload) -> anyhow::Result<()>;
}

/// Decode an encoded alert payload and hand it to `sink`.
pub async fn deliver<S>(sink: &S, payload: &[u8]) -> Result<AlertPayload, DeliveryError>
where
    S: AlertSink + ?Sized,
{
    let alert = AlertPayload::decode(payload)?;
    sink.on_alert(&alert).await.map_err(DeliveryError::Sink)?;
    Ok(alert)
}

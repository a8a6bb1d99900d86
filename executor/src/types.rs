//! Shared types for the alert response layer.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use detector::PayloadError;

/// What the response executor does after recording an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseAction {
    /// Record only.
    #[default]
    Log,
    /// Record and flip the shared [`MarketGuard`](crate::MarketGuard) to paused.
    Pause,
    /// Record and forward the alert to a notification channel.
    Notify,
}

impl ResponseAction {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseAction::Log => "log",
            ResponseAction::Pause => "pause",
            ResponseAction::Notify => "notify",
        }
    }
}

impl fmt::Display for ResponseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown response action {0:?} (expected log, pause or notify)")]
pub struct UnknownAction(pub String);

impl FromStr for ResponseAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(ResponseAction::Log),
            "pause" => Ok(ResponseAction::Pause),
            "notify" => Ok(ResponseAction::Notify),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Errors produced while performing a response action.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("notify action configured without a notification channel")]
    NoNotifier,

    #[error("notification channel full")]
    NotifierFull,

    #[error("notification channel closed")]
    NotifierClosed,
}

/// Errors from [`deliver`](crate::deliver).
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("could not decode alert payload: {0}")]
    Decode(#[from] PayloadError),

    #[error("alert sink failed: {0}")]
    Sink(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_case_insensitively() {
        assert_eq!("log".parse::<ResponseAction>().unwrap(), ResponseAction::Log);
        assert_eq!(" Pause ".parse::<ResponseAction>().unwrap(), ResponseAction::Pause);
        assert_eq!("NOTIFY".parse::<ResponseAction>().unwrap(), ResponseAction::Notify);
        assert!("halt".parse::<ResponseAction>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for action in [ResponseAction::Log, ResponseAction::Pause, ResponseAction::Notify] {
            assert_eq!(action.to_string().parse::<ResponseAction>().unwrap(), action);
        }
    }
}

use std::time::Duration;

use thiserror::Error;

use detector::Thresholds;
use executor::ResponseAction;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the market-state provider (`GET {url}/markets/{id}`).
    pub provider_url: String,

    /// Identifier of the single market this process watches.
    ///
    /// Also reported in alerts whose snapshot carries no identifier.
    pub market_id: String,

    // =========================
    // Detection thresholds
    // =========================
    /// Fixed for the lifetime of the process. Changing any of them means
    /// restarting with new environment values; nothing mutates them at runtime.
    pub thresholds: Thresholds,

    // =========================
    // Runner configuration
    // =========================
    /// Time between two snapshot collections.
    ///
    /// Each tick compares the new snapshot against the one from the previous
    /// tick only, so this is also the window over which price and volume
    /// moves are measured.
    pub poll_interval: Duration,

    /// What the response executor does on an alert.
    pub response_action: ResponseAction,

    /// Capacity of the alert notification channel (`notify` action).
    pub notify_capacity: usize,

    /// Emit JSON logs (`APP_ENV=production`).
    pub json_logs: bool,
}

impl AppConfig {
    pub const DEFAULT_PROVIDER_URL: &'static str = "http://127.0.0.1:8080";
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 12_000;
    pub const DEFAULT_NOTIFY_CAPACITY: usize = 64;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let market_id = get("MARKET_ID")
            .map(|v| v.trim().to_string())
            .ok_or(ConfigError::Missing("MARKET_ID"))?;

        let provider_url =
            get("PROVIDER_URL").unwrap_or_else(|| Self::DEFAULT_PROVIDER_URL.to_string());

        let thresholds = Thresholds::new(
            parse_or(
                get("PRICE_DELTA_THRESHOLD"),
                "PRICE_DELTA_THRESHOLD",
                Thresholds::DEFAULT_PRICE_DELTA,
            )?,
            parse_or(
                get("VOLUME_SPIKE_PERCENT"),
                "VOLUME_SPIKE_PERCENT",
                Thresholds::DEFAULT_VOLUME_SPIKE_PERCENT,
            )?,
            parse_or(
                get("SINGLE_TRADE_THRESHOLD"),
                "SINGLE_TRADE_THRESHOLD",
                Thresholds::DEFAULT_SINGLE_TRADE,
            )?,
        );

        let poll_ms = parse_or(
            get("POLL_INTERVAL_MS"),
            "POLL_INTERVAL_MS",
            Self::DEFAULT_POLL_INTERVAL_MS,
        )?;
        if poll_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "POLL_INTERVAL_MS",
                expected: "positive integer",
                value: "0".into(),
            });
        }

        let response_action = match get("RESPONSE_ACTION") {
            None => ResponseAction::default(),
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "RESPONSE_ACTION",
                expected: "response action (log, pause, notify)",
                value: v,
            })?,
        };

        let notify_capacity = parse_or(
            get("NOTIFY_CAPACITY"),
            "NOTIFY_CAPACITY",
            Self::DEFAULT_NOTIFY_CAPACITY,
        )?;

        let json_logs = get("APP_ENV").is_some_and(|v| v == "production");

        Ok(Self {
            provider_url,
            market_id,
            thresholds,
            poll_interval: Duration::from_millis(poll_ms),
            response_action,
            notify_capacity,
            json_logs,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected: "non-negative integer",
            value: v,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn market_id_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("MARKET_ID"))));
        assert!(matches!(
            load(&[("MARKET_ID", "  ")]),
            Err(ConfigError::Missing("MARKET_ID"))
        ));
    }

    #[test]
    fn defaults_apply() {
        let cfg = load(&[("MARKET_ID", "m1")]).unwrap();

        assert_eq!(cfg.market_id, "m1");
        assert_eq!(cfg.provider_url, AppConfig::DEFAULT_PROVIDER_URL);
        assert_eq!(cfg.thresholds, Thresholds::default());
        assert_eq!(cfg.poll_interval, Duration::from_millis(12_000));
        assert_eq!(cfg.response_action, ResponseAction::Log);
        assert!(!cfg.json_logs);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = load(&[
            ("MARKET_ID", "m1"),
            ("PROVIDER_URL", "http://provider:9000"),
            ("PRICE_DELTA_THRESHOLD", "150000"),
            ("VOLUME_SPIKE_PERCENT", "500"),
            ("SINGLE_TRADE_THRESHOLD", "5000000000000000000000"),
            ("POLL_INTERVAL_MS", "250"),
            ("RESPONSE_ACTION", "pause"),
            ("APP_ENV", "production"),
        ])
        .unwrap();

        assert_eq!(cfg.provider_url, "http://provider:9000");
        assert_eq!(cfg.thresholds.price_delta(), 150_000);
        assert_eq!(cfg.thresholds.volume_spike_percent(), 500);
        assert_eq!(cfg.thresholds.single_trade(), 5_000 * 10u128.pow(18));
        assert_eq!(cfg.poll_interval, Duration::from_millis(250));
        assert_eq!(cfg.response_action, ResponseAction::Pause);
        assert!(cfg.json_logs);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = load(&[("MARKET_ID", "m1"), ("PRICE_DELTA_THRESHOLD", "-5")]).unwrap_err();
        assert!(err.to_string().contains("PRICE_DELTA_THRESHOLD"));

        let err = load(&[("MARKET_ID", "m1"), ("RESPONSE_ACTION", "halt")]).unwrap_err();
        assert!(err.to_string().contains("RESPONSE_ACTION"));

        let err = load(&[("MARKET_ID", "m1"), ("POLL_INTERVAL_MS", "0")]).unwrap_err();
        assert!(err.to_string().contains("POLL_INTERVAL_MS"));
    }
}

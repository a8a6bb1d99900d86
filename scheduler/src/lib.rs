pub mod config;
pub mod counters;
pub mod monitor;

pub use config::{AppConfig, ConfigError};
pub use counters::Counters;
pub use monitor::{Monitor, TickOutcome};

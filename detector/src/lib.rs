pub mod engine;
pub mod payload;
pub mod rules;
pub mod thresholds;

pub use engine::{Decision, DecisionEngine, Response};
pub use payload::{AlertPayload, PayloadError};
pub use rules::TriggerRule;
pub use thresholds::Thresholds;

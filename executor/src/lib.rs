pub mod response;
pub mod sink;
pub mod types;

pub use response::{MarketGuard, ResponseExecutor};
pub use sink::{AlertSink, deliver};
pub use types::{DeliveryError, ResponseAction, ResponseError};

use tracing::{Span, field};

use super::TraceId;

/// Root span for one unit of work (a monitor tick, a one-off collection).
///
/// `market_id` is left empty so callers can record it once known.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id,
        market_id = field::Empty
    )
}

/// Child span; inherits the trace id from whichever root span is entered.
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name)
}

//! Trace context carried alongside outbound search requests.
//!
//! Responses from the search service arrive as a separate host event, outside
//! the span that dispatched the request. The dispatching span's ids travel in
//! the request's host context so the response handling can be linked back.

use serde::{Deserialize, Serialize};

/// Trace and parent span ids of the span that dispatched a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace id, 32 hex digits.
    pub trace_id: String,
    /// Span id of the dispatching span, 16 hex digits.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the ids of the current span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span is
    /// not sampled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_context_without_subscriber() {
        assert_eq!(TraceContext::from_current(), None);
    }
}

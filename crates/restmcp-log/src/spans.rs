//! Span helpers for request handling.

use tracing::{info_span, Span};

/// Span for one JSON-RPC message.
pub fn rpc_span(method: &str, id: Option<&str>) -> Span {
    info_span!(
        "rpc",
        method = %method,
        id = %id.unwrap_or("-"),
        error = tracing::field::Empty
    )
}

/// Span for one tool invocation.
pub fn tool_call_span(tool: &str) -> Span {
    info_span!(
        "tool_call",
        tool = %tool,
        is_error = tracing::field::Empty,
        error = tracing::field::Empty
    )
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", tracing::field::display(error));
}

/// Timing utility for operations.
pub struct Timer {
    start: std::time::Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    /// Elapsed time so far.
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }

    /// Complete the timer and record duration.
    pub fn finish(self) {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
    }
}

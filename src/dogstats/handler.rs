use crate::MetricsError;

/// Sink for failures that happen after a metric left the caller.
///
/// Dispatch never reports errors back to the thread that recorded a metric. Send
/// failures, truncated datagrams and shutdown problems are handed to this trait instead.
/// It is called from the dispatch thread, and from the thread calling
/// [`stop`](crate::StatsdClientTrait::stop) for shutdown errors.
///
/// Closures implement it:
///
/// ```
/// use insight_statsd::{ErrorHandler, MetricsError};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let failures = Arc::new(AtomicUsize::new(0));
/// let counted = Arc::clone(&failures);
/// let handler = move |_err: &MetricsError| {
///     counted.fetch_add(1, Ordering::Relaxed);
/// };
/// handler.handle(&MetricsError::from("boom"));
/// assert_eq!(failures.load(Ordering::Relaxed), 1);
/// ```
pub trait ErrorHandler: Send + Sync {
    /// Handles one non-fatal error.
    fn handle(&self, error: &MetricsError);
}

impl<F> ErrorHandler for F
where
    F: Fn(&MetricsError) + Send + Sync,
{
    fn handle(&self, error: &MetricsError) {
        self(error);
    }
}

/// Discards every error. This is the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopErrorHandler;

impl ErrorHandler for NoopErrorHandler {
    fn handle(&self, _error: &MetricsError) {}
}

/// Forwards every error to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorHandler;

impl ErrorHandler for TracingErrorHandler {
    fn handle(&self, error: &MetricsError) {
        tracing::warn!(error = %error, "Error dispatching metrics.");
    }
}

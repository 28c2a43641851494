use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while building the client or dispatching metrics.
///
/// Only [`MetricsError::Configuration`] is ever returned to a caller. Every other variant
/// is delivered to the configured [`ErrorHandler`](crate::ErrorHandler).
#[derive(Error, Debug)]
pub enum MetricsError {
    /// The client could not be started: the remote address did not resolve, the socket
    /// could not be opened or the dispatch thread could not be spawned.
    #[error("Failed to start StatsD client: {message}")]
    Configuration {
        /// What was being set up when the failure happened.
        message: String,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error from the standard library.
    #[error("Std Io error: {0}")]
    StdIo(#[from] std::io::Error),

    /// The OS accepted fewer bytes than the datagram held. The datagram is not retried.
    #[error("Could not send entirely stat to host {destination}. Only sent {sent} bytes out of {expected} bytes")]
    PartialSend {
        /// Bytes accepted by the send call.
        sent: usize,
        /// Bytes queued in the datagram.
        expected: usize,
        /// The remote the datagram was addressed to.
        destination: String,
    },

    /// A single metric line does not fit in one datagram and was dropped.
    #[error("Metric is larger than {max} ({len} bytes)")]
    LineTooLarge {
        /// Length of the rejected line in bytes.
        len: usize,
        /// Datagram size ceiling in bytes.
        max: usize,
    },

    /// The dispatch thread did not finish draining within the shutdown grace period.
    #[error("Timed out after {0:?} waiting for the dispatch thread to drain")]
    ShutdownTimeout(Duration),

    /// The dispatch thread panicked before it could shut down cleanly.
    #[error("Dispatch thread panicked")]
    ConsumerPanicked,

    /// A custom error with a free-form message.
    #[error("Custom error: {0}")]
    Custom(String),
}

impl MetricsError {
    pub(crate) fn configuration(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Configuration {
            message: message.into(),
            source,
        }
    }
}

impl From<String> for MetricsError {
    fn from(value: String) -> Self {
        Self::Custom(value)
    }
}

impl From<&str> for MetricsError {
    fn from(value: &str) -> Self {
        Self::Custom(value.to_string())
    }
}

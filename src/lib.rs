//! # insight-statsd
//!
//! A non-blocking `DogStatsD`-style metrics client for Rust.
//!
//! ## Features
//!
//! - **Never blocks the caller**: metric lines are formatted on the calling thread and
//!   handed to a background thread through an unbounded queue
//! - **Batched UDP**: the background thread packs lines into datagrams of at most
//!   1500 bytes and sends as soon as the queue runs dry
//! - **Locale-independent numbers**: floats always use `.` and at most six fractional digits
//! - **Metric Types**: Counters, Gauges, Histograms and Timers, with constant and ad-hoc tags
//!
//! ## Quick Start
//!
//! ```no_run
//! use insight_statsd::{StatsdClient, StatsdClientOptions, StatsdClientTrait, TracingErrorHandler};
//! use insight_statsd::{count, gauge, histogram, time};
//! use std::sync::Arc;
//!
//! let options = StatsdClientOptions {
//!     prefix: "myapp".to_string(),
//!     host: "localhost".to_string(),
//!     port: 8251,
//!     constant_tags: vec!["env:prod".to_string()],
//!     error_handler: Arc::new(TracingErrorHandler),
//!     ..StatsdClientOptions::default()
//! };
//! let client = StatsdClient::new(options).expect("statsd client starts");
//!
//! // Direct API
//! client.count("request.count", 1, &["endpoint:api"]);
//! client.gauge("connections.active", 100, &["pool:main"]);
//! client.histogram("response.size", 0.5, &[]);
//! client.time("request.latency", 42, &["endpoint:api"]);
//!
//! // Convenience macros
//! count!(client, "request.count", 1, "endpoint:api");
//! gauge!(client, "connections.active", 100, "pool:main");
//! histogram!(client, "response.size", 0.5);
//! time!(client, "request.latency", 42, "endpoint:api");
//!
//! // Sends whatever is still queued, then closes the socket
//! client.stop();
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

// https://docs.datadoghq.com/developers/dogstatsd/datagram_shell/?tab=metrics
mod dogstats;
mod error;

pub use dogstats::client::{
    StatsdClient, StatsdClientOptions, StatsdClientTrait, DEFAULT_HOST, DEFAULT_POLL_TIMEOUT,
    DEFAULT_PORT, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use dogstats::handler::{ErrorHandler, NoopErrorHandler, TracingErrorHandler};
pub use dogstats::writer::{UdpSocketWriter, Writer};
pub use dogstats::{
    format_line, render_tags, MetricType, MetricValue, DEFAULT_MAX_PACKET_SIZE,
};
pub use error::MetricsError;

/// Result type for metric operations.
///
/// Wraps errors that can occur while starting the client and transmitting metrics.
pub type MetricResult<T> = Result<T, MetricsError>;

use std::fmt;
use std::sync::Arc;
use std::thread::{Builder, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::format::format_line;
use super::handler::{ErrorHandler, NoopErrorHandler};
use super::job::DispatchJob;
use super::tags::render_constant_tags;
use super::writer::{PacketWriter, UdpSocketWriter, Writer};
use super::{MetricType, MetricValue, DEFAULT_MAX_PACKET_SIZE};
use crate::{MetricResult, MetricsError};

/// Default agent host name.
pub const DEFAULT_HOST: &str = "localhost";

/// Default agent port.
pub const DEFAULT_PORT: u16 = 8251;

/// How long the dispatch thread waits for a line before checking for shutdown again.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// How long [`stop`](StatsdClientTrait::stop) waits for queued lines to be sent.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

const DISPATCH_THREAD_NAME: &str = "insight-statsd-dispatch";

/// Trait defining the interface for recording metrics.
///
/// Every method formats one line on the calling thread, queues it and returns at once.
/// No method blocks on the network and none reports delivery failures; those go to the
/// client's [`ErrorHandler`].
pub trait StatsdClientTrait {
    /// Adjusts a counter by `delta`, which may be negative.
    fn count(&self, name: &str, delta: i64, tags: &[&str]);

    /// Increments a counter by one.
    fn increment_counter(&self, name: &str, tags: &[&str]) {
        self.count(name, 1, tags);
    }

    /// Alias for [`increment_counter`](Self::increment_counter).
    fn increment(&self, name: &str, tags: &[&str]) {
        self.increment_counter(name, tags);
    }

    /// Decrements a counter by one.
    fn decrement_counter(&self, name: &str, tags: &[&str]) {
        self.count(name, -1, tags);
    }

    /// Alias for [`decrement_counter`](Self::decrement_counter).
    fn decrement(&self, name: &str, tags: &[&str]) {
        self.decrement_counter(name, tags);
    }

    /// Records the current value of a gauge.
    fn record_gauge_value<V: Into<MetricValue>>(&self, name: &str, value: V, tags: &[&str]);

    /// Alias for [`record_gauge_value`](Self::record_gauge_value).
    fn gauge<V: Into<MetricValue>>(&self, name: &str, value: V, tags: &[&str]) {
        self.record_gauge_value(name, value, tags);
    }

    /// Records an execution time in milliseconds.
    fn record_execution_time(&self, name: &str, millis: i64, tags: &[&str]);

    /// Alias for [`record_execution_time`](Self::record_execution_time).
    fn time(&self, name: &str, millis: i64, tags: &[&str]) {
        self.record_execution_time(name, millis, tags);
    }

    /// Records one sample of a distribution.
    fn record_histogram_value<V: Into<MetricValue>>(&self, name: &str, value: V, tags: &[&str]);

    /// Alias for [`record_histogram_value`](Self::record_histogram_value).
    fn histogram<V: Into<MetricValue>>(&self, name: &str, value: V, tags: &[&str]) {
        self.record_histogram_value(name, value, tags);
    }

    /// Stops dispatching. Lines already queued are sent before the transport is closed.
    /// The transport is closed anyway once the shutdown timeout runs out.
    ///
    /// Only the first call does anything; later calls return immediately.
    fn stop(&self);
}

/// Configuration options for the client.
///
/// Every field is read once, at construction.
pub struct StatsdClientOptions {
    /// Prefix for every metric name. A `.` separator is added when it is not empty.
    pub prefix: String,
    /// Host name or address of the agent, resolved once.
    pub host: String,
    /// UDP port of the agent.
    pub port: u16,
    /// Tags added to every metric, rendered once.
    pub constant_tags: Vec<String>,
    /// Receives errors raised while dispatching or shutting down.
    pub error_handler: Arc<dyn ErrorHandler>,
    /// Maximum size of one datagram in bytes.
    pub max_packet_size: usize,
    /// Longest wait for the next line before the dispatch thread re-checks for shutdown.
    pub poll_timeout: Duration,
    /// Longest time [`stop`](StatsdClientTrait::stop) waits for the queue to drain.
    pub shutdown_timeout: Duration,
}

impl fmt::Debug for StatsdClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsdClientOptions")
            .field("prefix", &self.prefix)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("constant_tags", &self.constant_tags)
            .field("error_handler", &"ErrorHandler(...)")
            .field("max_packet_size", &self.max_packet_size)
            .field("poll_timeout", &self.poll_timeout)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}

impl Default for StatsdClientOptions {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            constant_tags: Vec::new(),
            error_handler: Arc::new(NoopErrorHandler),
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

enum DispatchState {
    Running {
        // dropping it is the shutdown signal
        shutdown: Sender<()>,
        // disconnects when the dispatch thread exits
        done: Receiver<()>,
        handle: JoinHandle<()>,
        transport: Arc<dyn Writer>,
    },
    Stopped,
}

/// A metrics client that formats lines on the caller's thread and sends them in batched
/// UDP datagrams from a background thread.
///
/// This type is `Send + Sync` and can be shared across threads via `Arc<StatsdClient>`.
/// Dropping it stops it.
///
/// # Example
///
/// ```no_run
/// use insight_statsd::{StatsdClient, StatsdClientOptions, StatsdClientTrait};
///
/// let options = StatsdClientOptions {
///     prefix: "my.prefix".to_string(),
///     host: "127.0.0.1".to_string(),
///     port: 8251,
///     constant_tags: vec!["env:prod".to_string()],
///     ..StatsdClientOptions::default()
/// };
/// let client = StatsdClient::new(options).expect("client starts");
///
/// client.count("requests", 1, &["endpoint:api"]);
/// client.gauge("queue.depth", 0.75, &[]);
/// client.time("request.latency", 42, &["endpoint:api"]);
/// client.stop();
/// ```
pub struct StatsdClient {
    prefix: String,
    constant_tags: Option<String>,
    sender: Sender<String>,
    handler: Arc<dyn ErrorHandler>,
    shutdown_timeout: Duration,
    state: Mutex<DispatchState>,
}

impl fmt::Debug for StatsdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsdClient")
            .field("prefix", &self.prefix)
            .field("constant_tags", &self.constant_tags)
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}

impl StatsdClient {
    /// Creates a client sending to `options.host:options.port` over UDP.
    ///
    /// # Errors
    /// Returns [`MetricsError::Configuration`] when the address cannot be resolved, the
    /// socket cannot be opened or the dispatch thread cannot be spawned.
    pub fn new(options: StatsdClientOptions) -> MetricResult<Self> {
        let writer = UdpSocketWriter::connect((options.host.as_str(), options.port))?;
        let destination = writer.destination().to_string();
        Self::start(options, writer, destination)
    }

    /// Creates a client sending through a custom transport.
    ///
    /// `options.host` and `options.port` only label errors.
    ///
    /// # Errors
    /// Returns [`MetricsError::Configuration`] when the dispatch thread cannot be spawned.
    pub fn with_writer<T>(options: StatsdClientOptions, writer: T) -> MetricResult<Self>
    where
        T: Writer + 'static,
    {
        let destination = format!("{}:{}", options.host, options.port);
        Self::start(options, writer, destination)
    }

    fn start<T>(options: StatsdClientOptions, writer: T, destination: String) -> MetricResult<Self>
    where
        T: Writer + 'static,
    {
        let prefix = if options.prefix.is_empty() {
            String::new()
        } else {
            format!("{}.", options.prefix)
        };
        let constant_tags = render_constant_tags(&options.constant_tags);

        let (sender, lines) = unbounded::<String>();
        let (shutdown, shutdown_rx) = bounded::<()>(0);
        let (done_tx, done) = bounded::<()>(0);

        let packet = PacketWriter::new(writer, destination, options.max_packet_size);
        let transport: Arc<dyn Writer> = packet.transport();
        let job = DispatchJob::new(packet, Arc::clone(&options.error_handler));
        let poll_timeout = options.poll_timeout;

        let handle = Builder::new()
            .name(DISPATCH_THREAD_NAME.to_string())
            .spawn(move || {
                let _done = done_tx;
                job.run(&lines, &shutdown_rx, poll_timeout);
            })
            .map_err(|err| MetricsError::configuration("cannot spawn dispatch thread", err))?;

        debug!(prefix = %prefix, "Started StatsD client.");

        Ok(Self {
            prefix,
            constant_tags,
            sender,
            handler: options.error_handler,
            shutdown_timeout: options.shutdown_timeout,
            state: Mutex::new(DispatchState::Running {
                shutdown,
                done,
                handle,
                transport,
            }),
        })
    }

    /// Whether [`stop`](StatsdClientTrait::stop) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(*self.state.lock(), DispatchState::Stopped)
    }

    fn send(&self, name: &str, value: MetricValue, metric_type: MetricType, tags: &[&str]) {
        let line = format_line(
            &self.prefix,
            name,
            value,
            metric_type,
            tags,
            self.constant_tags.as_deref(),
        );
        // only fails once the dispatch thread is gone
        if self.sender.send(line).is_err() {
            trace!("Dispatch stopped, dropping metric line.");
        }
    }
}

impl StatsdClientTrait for StatsdClient {
    fn count(&self, name: &str, delta: i64, tags: &[&str]) {
        self.send(name, MetricValue::Integer(delta), MetricType::Count, tags);
    }

    fn record_gauge_value<V: Into<MetricValue>>(&self, name: &str, value: V, tags: &[&str]) {
        self.send(name, value.into(), MetricType::Gauge, tags);
    }

    fn record_execution_time(&self, name: &str, millis: i64, tags: &[&str]) {
        self.send(name, MetricValue::Integer(millis), MetricType::Timer, tags);
    }

    fn record_histogram_value<V: Into<MetricValue>>(&self, name: &str, value: V, tags: &[&str]) {
        self.send(name, value.into(), MetricType::Histogram, tags);
    }

    fn stop(&self) {
        // only the first caller gets the running state; the wait happens outside the lock
        let state = std::mem::replace(&mut *self.state.lock(), DispatchState::Stopped);
        let DispatchState::Running {
            shutdown,
            done,
            handle,
            transport,
        } = state
        else {
            return;
        };

        debug!("Stopping StatsD client.");
        drop(shutdown);

        match done.recv_timeout(self.shutdown_timeout) {
            Err(RecvTimeoutError::Timeout) => {
                // the dispatch thread is left detached and stops at its next check
                self.handler
                    .handle(&MetricsError::ShutdownTimeout(self.shutdown_timeout));
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if handle.join().is_err() {
                    self.handler.handle(&MetricsError::ConsumerPanicked);
                }
            }
        }

        // no-op when the dispatch thread already closed it
        if let Err(err) = transport.close() {
            self.handler.handle(&MetricsError::StdIo(err));
        }
    }
}

impl Drop for StatsdClient {
    fn drop(&mut self) {
        self.stop();
    }
}

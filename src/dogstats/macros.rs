/// Adjusts a counter with a variable number of tags.
///
/// Tags may be anything that implements `AsRef<str>`, so string literals and `format!`
/// results can be mixed.
///
/// # Examples
///
/// ```
/// use insight_statsd::{count, StatsdClient, StatsdClientOptions, StatsdClientTrait};
///
/// let options = StatsdClientOptions {
///     host: "127.0.0.1".to_string(),
///     ..StatsdClientOptions::default()
/// };
/// let client = StatsdClient::new(options).unwrap();
///
/// count!(client, "requests.total", 1, "endpoint:api", format!("status:{}", 200));
/// count!(client, "retries.total", -2);
/// ```
#[macro_export]
macro_rules! count {
    // With tags
    ($client:expr, $metric:expr, $delta:expr $(, $tag:expr)+) => {
        $client.count($metric, $delta, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    // Without tags
    ($client:expr, $metric:expr, $delta:expr) => {
        $client.count($metric, $delta, &[])
    };
}

/// Increments a counter by one with a variable number of tags.
///
/// # Examples
///
/// ```
/// use insight_statsd::{increment, StatsdClient, StatsdClientOptions, StatsdClientTrait};
///
/// let options = StatsdClientOptions {
///     host: "127.0.0.1".to_string(),
///     ..StatsdClientOptions::default()
/// };
/// let client = StatsdClient::new(options).unwrap();
///
/// increment!(client, "logins", "method:password");
/// increment!(client, "heartbeat");
/// ```
#[macro_export]
macro_rules! increment {
    ($client:expr, $metric:expr $(, $tag:expr)+) => {
        $client.increment_counter($metric, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    ($client:expr, $metric:expr) => {
        $client.increment_counter($metric, &[])
    };
}

/// Decrements a counter by one with a variable number of tags.
#[macro_export]
macro_rules! decrement {
    ($client:expr, $metric:expr $(, $tag:expr)+) => {
        $client.decrement_counter($metric, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    ($client:expr, $metric:expr) => {
        $client.decrement_counter($metric, &[])
    };
}

/// Records a gauge value, integral or floating-point, with a variable number of tags.
///
/// # Examples
///
/// ```
/// use insight_statsd::{gauge, StatsdClient, StatsdClientOptions, StatsdClientTrait};
///
/// let options = StatsdClientOptions {
///     host: "127.0.0.1".to_string(),
///     ..StatsdClientOptions::default()
/// };
/// let client = StatsdClient::new(options).unwrap();
///
/// gauge!(client, "connections.active", 42, "pool:main");
/// gauge!(client, "cpu.load", 0.75);
/// ```
#[macro_export]
macro_rules! gauge {
    ($client:expr, $metric:expr, $value:expr $(, $tag:expr)+) => {
        $client.record_gauge_value($metric, $value, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    ($client:expr, $metric:expr, $value:expr) => {
        $client.record_gauge_value($metric, $value, &[])
    };
}

/// Records a histogram sample with a variable number of tags.
#[macro_export]
macro_rules! histogram {
    ($client:expr, $metric:expr, $value:expr $(, $tag:expr)+) => {
        $client.record_histogram_value($metric, $value, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    ($client:expr, $metric:expr, $value:expr) => {
        $client.record_histogram_value($metric, $value, &[])
    };
}

/// Records an execution time in milliseconds with a variable number of tags.
///
/// # Examples
///
/// ```
/// use insight_statsd::{time, StatsdClient, StatsdClientOptions, StatsdClientTrait};
///
/// let options = StatsdClientOptions {
///     host: "127.0.0.1".to_string(),
///     ..StatsdClientOptions::default()
/// };
/// let client = StatsdClient::new(options).unwrap();
///
/// time!(client, "request.latency", 123, "endpoint:api");
/// ```
#[macro_export]
macro_rules! time {
    ($client:expr, $metric:expr, $millis:expr $(, $tag:expr)+) => {
        $client.record_execution_time($metric, $millis, &[$(::core::convert::AsRef::<str>::as_ref(&$tag)),+])
    };
    ($client:expr, $metric:expr, $millis:expr) => {
        $client.record_execution_time($metric, $millis, &[])
    };
}

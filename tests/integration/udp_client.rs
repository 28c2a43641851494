use crate::support::{create_client, DummyStatsdServer};
use insight_statsd::{MetricsError, StatsdClient, StatsdClientOptions, StatsdClientTrait};

const PREFIX: &str = "my.prefix";

fn setup() -> (DummyStatsdServer, StatsdClient) {
    let server = DummyStatsdServer::new();
    let client = create_client(server.port(), PREFIX, &[]);
    (server, client)
}

// ============================================================================
// Counters
// ============================================================================

#[test]
fn test_sends_counter_value() {
    let (server, client) = setup();
    client.count("mycount", 24, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.mycount:24|c");
    client.stop();
}

#[test]
fn test_sends_counter_value_with_tags() {
    let (server, client) = setup();
    client.count("mycount", 24, &["foo:bar", "baz"]);
    assert_eq!(server.wait_for_message(), "my.prefix.mycount:24|c|#baz,foo:bar");
    client.stop();
}

#[test]
fn test_sends_counter_increment() {
    let (server, client) = setup();
    client.increment_counter("myinc", &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.myinc:1|c");

    client.increment("myinc", &["foo:bar", "baz"]);
    assert_eq!(server.wait_for_message(), "my.prefix.myinc:1|c|#baz,foo:bar");
    client.stop();
}

#[test]
fn test_sends_counter_decrement() {
    let (server, client) = setup();
    client.decrement_counter("mydec", &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.mydec:-1|c");

    client.decrement("mydec", &["foo:bar", "baz"]);
    assert_eq!(server.wait_for_message(), "my.prefix.mydec:-1|c|#baz,foo:bar");
    client.stop();
}

// ============================================================================
// Gauges
// ============================================================================

#[test]
fn test_sends_gauge() {
    let (server, client) = setup();
    client.record_gauge_value("mygauge", 423, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.mygauge:423|g");
    client.stop();
}

#[test]
fn test_sends_large_double_gauge() {
    let (server, client) = setup();
    client.record_gauge_value("mygauge", 123_456_789_012_345.678_90, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.mygauge:123456789012345.67|g");
    client.stop();
}

#[test]
fn test_sends_exact_double_gauge() {
    #[allow(clippy::excessive_precision)]
    let value = 123.456_789_012_345_678_90;
    let (server, client) = setup();
    client.record_gauge_value("mygauge", value, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.mygauge:123.456789|g");
    client.stop();
}

#[test]
fn test_sends_double_gauge() {
    let (server, client) = setup();
    client.record_gauge_value("mygauge", 0.423, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.mygauge:0.423|g");
    client.stop();
}

#[test]
fn test_sends_gauge_with_tags() {
    let (server, client) = setup();
    client.gauge("mygauge", 423, &["foo:bar", "baz"]);
    assert_eq!(server.wait_for_message(), "my.prefix.mygauge:423|g|#baz,foo:bar");

    client.gauge("mygauge", 0.423, &["foo:bar", "baz"]);
    assert_eq!(server.wait_for_message(), "my.prefix.mygauge:0.423|g|#baz,foo:bar");
    client.stop();
}

#[test]
fn test_sends_nan_gauge() {
    let (server, client) = setup();
    client.record_gauge_value("mygauge", f64::NAN, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.mygauge:NaN|g");
    client.stop();
}

#[test]
fn test_sends_gauge_mixed_tags() {
    let server = DummyStatsdServer::new();
    let client = create_client(server.port(), PREFIX, &["instance:foo", "app:bar"]);
    client.gauge("value", 423, &["baz"]);
    assert_eq!(
        server.wait_for_message(),
        "my.prefix.value:423|g|#app:bar,instance:foo,baz"
    );
    client.stop();
}

#[test]
fn test_sends_gauge_constant_tags_only() {
    let server = DummyStatsdServer::new();
    let client = create_client(server.port(), PREFIX, &["instance:foo", "app:bar"]);
    client.gauge("value", 423, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.value:423|g|#app:bar,instance:foo");
    client.stop();
}

#[test]
fn test_sends_gauge_empty_prefix() {
    let server = DummyStatsdServer::new();
    let client = create_client(server.port(), "", &[]);
    client.gauge("top.level.value", 423, &[]);
    assert_eq!(server.wait_for_message(), "top.level.value:423|g");
    client.stop();
}

// ============================================================================
// Histograms and timers
// ============================================================================

#[test]
fn test_sends_histogram() {
    let (server, client) = setup();
    client.record_histogram_value("myhistogram", 423, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.myhistogram:423|h");

    client.histogram("myhistogram", 0.423, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.myhistogram:0.423|h");
    client.stop();
}

#[test]
fn test_sends_histogram_with_tags() {
    let (server, client) = setup();
    client.histogram("myhistogram", 423, &["foo:bar", "baz"]);
    assert_eq!(server.wait_for_message(), "my.prefix.myhistogram:423|h|#baz,foo:bar");

    client.histogram("myhistogram", 0.423, &["foo:bar", "baz"]);
    assert_eq!(server.wait_for_message(), "my.prefix.myhistogram:0.423|h|#baz,foo:bar");
    client.stop();
}

#[test]
fn test_sends_timer() {
    let (server, client) = setup();
    client.record_execution_time("mytime", 123, &[]);
    assert_eq!(server.wait_for_message(), "my.prefix.mytime:123|ms");

    client.time("mytime", 123, &["foo:bar", "baz"]);
    assert_eq!(server.wait_for_message(), "my.prefix.mytime:123|ms|#baz,foo:bar");
    client.stop();
}

// ============================================================================
// Batching and lifecycle
// ============================================================================

#[test]
fn test_lines_from_one_thread_arrive_in_order() {
    let (server, client) = setup();
    for i in 0..100 {
        client.count("ordered", i, &[]);
    }

    let lines = server.wait_for_lines(100);
    let expected: Vec<String> = (0..100)
        .map(|i| format!("my.prefix.ordered:{i}|c"))
        .collect();
    assert_eq!(lines, expected);
    client.stop();
}

#[test]
fn test_stop_is_idempotent() {
    let (_server, client) = setup();
    assert!(!client.is_stopped());

    client.stop();
    assert!(client.is_stopped());
    client.stop();
    assert!(client.is_stopped());
}

#[test]
fn test_metrics_after_stop_are_ignored() {
    let (_server, client) = setup();
    client.stop();

    client.count("late", 1, &[]);
    client.gauge("late", 0.5, &["tag"]);
    assert!(client.is_stopped());
}

#[test]
fn test_unresolvable_host_fails_construction() {
    let options = StatsdClientOptions {
        host: "host.invalid.".to_string(),
        ..StatsdClientOptions::default()
    };
    let err = StatsdClient::new(options).unwrap_err();
    assert!(matches!(err, MetricsError::Configuration { .. }));
    assert!(err.to_string().starts_with("Failed to start StatsD client"));
}

//! Basic usage of all four metric types using the direct API.
//!
//! Run with: `cargo run --example basic`

use insight_statsd::{StatsdClient, StatsdClientOptions, StatsdClientTrait, TracingErrorHandler};
use std::sync::Arc;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let options = StatsdClientOptions {
        prefix: "myapp".to_string(),
        host: "127.0.0.1".to_string(),
        constant_tags: vec!["env:demo".to_string()],
        error_handler: Arc::new(TracingErrorHandler),
        ..StatsdClientOptions::default()
    };
    let client = StatsdClient::new(options).expect("failed to start statsd client");

    // Counter, by an arbitrary delta
    client.count("bytes.sent", 1024, &["endpoint:api"]);

    // Counter, by one in either direction
    client.increment("request.count", &["endpoint:api", "method:get"]);
    client.decrement("connections.idle", &[]);

    // Gauge, integer or floating point
    client.gauge("connections.active", 100, &["pool:main"]);
    client.gauge("cpu.load", 0.75, &[]);

    // Histogram
    client.histogram("request.size", 512, &["endpoint:api"]);

    // Timer in milliseconds
    client.time("request.latency", 42, &["endpoint:api"]);

    // Stop sends anything still queued before exiting
    client.stop();

    println!("All metric types recorded and flushed.");
}

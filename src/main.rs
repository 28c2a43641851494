use insight_statsd::{StatsdClient, StatsdClientOptions, StatsdClientTrait, DEFAULT_PORT};
use std::time::Instant;

const SERVER_HOST: &str = "127.0.0.1";

fn main() {
    let iterations: usize = std::env::args()
        .nth(1)
        .map_or(1_000_000, |arg| arg.parse().unwrap());

    let options = StatsdClientOptions {
        prefix: "load".to_string(),
        host: SERVER_HOST.to_string(),
        port: DEFAULT_PORT,
        constant_tags: vec!["source:load-generator".to_string()],
        ..StatsdClientOptions::default()
    };

    let client = StatsdClient::new(options).unwrap();

    let n = 1024;
    let metrics: Vec<String> = (0..n)
        .map(|i| format!("some.long.metric.by.some.criteria{i}"))
        .collect();
    let tags: Vec<String> = (0..n)
        .map(|i| format!("sometag:somevaluefromcriteria{i}"))
        .collect();

    let instant = Instant::now();
    for i in 0..iterations {
        let metric = &metrics[i % n];
        let tag = tags[i % n].as_str();
        match i % 4 {
            0 => client.count(metric, 1, &[tag, "tag:value"]),
            1 => client.gauge(metric, i as f64 / 3.0, &[tag]),
            2 => client.histogram(metric, i as i64, &[tag]),
            _ => client.time(metric, (i % 1000) as i64, &[]),
        }
    }
    let enqueued = instant.elapsed();

    client.stop();
    println!(
        "enqueued {iterations} metrics in {}ms, drained in {}ms",
        enqueued.as_millis(),
        instant.elapsed().as_millis()
    );
}

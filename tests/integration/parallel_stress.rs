use crate::support::{writer_options, CapturingWriter, RecordingHandler};
use insight_statsd::{StatsdClient, StatsdClientOptions, StatsdClientTrait};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

fn create_test_client(writer: &CapturingWriter, handler: &RecordingHandler) -> Arc<StatsdClient> {
    let options = StatsdClientOptions {
        constant_tags: vec!["test:parallel".to_string()],
        ..writer_options("stress", handler)
    };
    Arc::new(StatsdClient::with_writer(options, writer.clone()).unwrap())
}

#[test]
fn test_parallel_producers_lose_nothing() {
    let writer = CapturingWriter::default();
    let handler = RecordingHandler::default();
    let client = create_test_client(&writer, &handler);
    let num_threads = 8;
    let iterations_per_thread = 5_000;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                let thread_tag = format!("thread:{thread_id}");
                for i in 0..iterations_per_thread {
                    client.count("parallel.count", i, &[thread_tag.as_str()]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    client.stop();

    let lines = writer.lines();
    assert_eq!(lines.len(), num_threads * iterations_per_thread as usize);

    // every producer's lines arrive exactly once and in the order it issued them
    let mut next_expected: HashMap<String, i64> = HashMap::new();
    for line in &lines {
        let (value, thread_tag) = line
            .strip_prefix("stress.parallel.count:")
            .and_then(|rest| rest.split_once("|c|#test:parallel,"))
            .unwrap_or_else(|| panic!("unexpected line {line}"));
        let expected = next_expected.entry(thread_tag.to_string()).or_insert(0);
        assert_eq!(value.parse::<i64>().unwrap(), *expected, "out of order for {thread_tag}");
        *expected += 1;
    }
    assert_eq!(next_expected.len(), num_threads);
    assert!(next_expected
        .values()
        .all(|count| *count == iterations_per_thread));

    for packet in writer.packets() {
        assert!(packet.len() <= insight_statsd::DEFAULT_MAX_PACKET_SIZE);
    }
    assert!(handler.errors().is_empty());
}

#[test]
fn test_parallel_mixed_metric_types() {
    let writer = CapturingWriter::default();
    let handler = RecordingHandler::default();
    let client = create_test_client(&writer, &handler);

    let handles: Vec<_> = (0..4)
        .map(|thread_id| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                for i in 0..1_000 {
                    let dynamic_tag = format!("iteration:{i}");
                    client.count("mixed.count", 1, &[]);
                    client.gauge("mixed.gauge", f64::from(thread_id) + 0.5, &[dynamic_tag.as_str()]);
                    client.histogram("mixed.histogram", i, &["kind:static"]);
                    client.time("mixed.time", i64::from(i), &[]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    client.stop();

    let lines = writer.lines();
    assert_eq!(lines.len(), 4 * 1_000 * 4);
    for suffix in ["|c|#test:parallel", "|ms|#test:parallel"] {
        assert_eq!(lines.iter().filter(|line| line.ends_with(suffix)).count(), 4_000);
    }
    assert_eq!(
        lines
            .iter()
            .filter(|line| line.starts_with("stress.mixed.gauge:") && line.contains(".5|g|#test:parallel,iteration:"))
            .count(),
        4_000
    );
    assert_eq!(
        lines
            .iter()
            .filter(|line| line.ends_with("|h|#test:parallel,kind:static"))
            .count(),
        4_000
    );
}

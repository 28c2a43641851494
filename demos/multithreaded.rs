//! Sharing a StatsdClient across multiple threads using Arc.
//!
//! Run with: `cargo run --example multithreaded`

use insight_statsd::{count, histogram, StatsdClient, StatsdClientOptions, StatsdClientTrait};
use std::sync::Arc;

fn main() {
    let options = StatsdClientOptions {
        prefix: "myapp".to_string(),
        host: "127.0.0.1".to_string(),
        ..StatsdClientOptions::default()
    };
    let client = Arc::new(StatsdClient::new(options).unwrap());

    let mut handles = Vec::new();

    // Spawn worker threads that record metrics concurrently
    for thread_id in 0..4 {
        let client = client.clone();
        let handle = std::thread::spawn(move || {
            let tag = format!("thread:{thread_id}");

            for i in 0..100 {
                // Direct API
                client.time("task.duration", i * 10, &["pool:workers", tag.as_str()]);

                // Macros work too
                count!(client, "tasks.completed", 1, format!("thread:{thread_id}"));
                histogram!(client, "task.size", i);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // stop() only needs a shared reference, so any clone of the Arc can call it
    client.stop();

    println!("All threads finished. Metrics flushed.");
}

#![no_main]

use insight_statsd::{NoopErrorHandler, StatsdClient, StatsdClientOptions, StatsdClientTrait, Writer};
use libfuzzer_sys::fuzz_target;
use std::io;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Capture {
    sizes: Arc<Mutex<Vec<usize>>>,
}

impl Writer for Capture {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.sizes.lock().unwrap().push(buf.len());
        Ok(buf.len())
    }
}

// Fuzz target focusing on packet size limits and edge cases
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    // Use first 2 bytes to determine packet size (within reasonable limits)
    let packet_size = u16::from_le_bytes([data[0], data[1]]);
    let packet_size = usize::from((packet_size % 8192).max(64)); // 64 to 8192 bytes

    let options = StatsdClientOptions {
        max_packet_size: packet_size,
        error_handler: Arc::new(NoopErrorHandler),
        ..StatsdClientOptions::default()
    };
    let capture = Capture::default();
    let client = StatsdClient::with_writer(options, capture.clone()).unwrap();

    // Create a large metric name and many tags to test packet limits
    let metric_base = String::from_utf8_lossy(&data[3..]);
    let metric_name = format!("test.metric.{}", metric_base);
    let tags: Vec<String> = (0..usize::from(data[2] % 20))
        .map(|i| format!("tag{}:value{}", i, metric_base))
        .collect();
    let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();

    // Send multiple metrics to test batching and packet limits
    for i in 0..10 {
        client.increment(&format!("{}.{}", metric_name, i), &tag_refs);
        client.gauge(&format!("{}.gauge.{}", metric_name, i), i, &tag_refs);
        client.histogram(&format!("{}.hist.{}", metric_name, i), f64::from(i) * 0.5, &tag_refs);
    }
    client.stop();

    for size in capture.sizes.lock().unwrap().iter() {
        assert!(*size > 0 && *size <= packet_size);
    }
});

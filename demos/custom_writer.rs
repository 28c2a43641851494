//! Using a custom writer to capture datagrams instead of sending them via UDP.
//!
//! Run with: `cargo run --example custom_writer`

use insight_statsd::{StatsdClient, StatsdClientOptions, StatsdClientTrait, Writer};
use std::io;
use std::sync::{Arc, Mutex};

/// A custom writer that stores datagrams in a shared Vec instead of sending UDP.
struct InMemoryWriter {
    packets: Arc<Mutex<Vec<String>>>,
}

impl Writer for InMemoryWriter {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let packet = String::from_utf8_lossy(buf).into_owned();
        self.packets.lock().unwrap().push(packet);
        Ok(buf.len())
    }

    fn close(&self) -> io::Result<()> {
        println!("writer closed");
        Ok(())
    }
}

fn main() {
    let packets = Arc::new(Mutex::new(Vec::new()));
    let writer = InMemoryWriter {
        packets: packets.clone(),
    };

    let options = StatsdClientOptions {
        prefix: "app".to_string(),
        max_packet_size: 64,
        error_handler: Arc::new(|err: &insight_statsd::MetricsError| eprintln!("metrics: {err}")),
        ..StatsdClientOptions::default()
    };
    let client = StatsdClient::with_writer(options, writer).unwrap();

    for i in 0..10 {
        client.count("request.count", i, &["endpoint:api"]);
    }
    client.gauge("connections", 10, &["pool:main"]);

    // Stop drains the queue and closes the writer
    client.stop();

    let captured = packets.lock().unwrap();
    println!("Captured {} datagrams:", captured.len());
    for packet in captured.iter() {
        println!("--- {} bytes", packet.len());
        for line in packet.lines() {
            println!("  {line}");
        }
    }
}

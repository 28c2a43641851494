use insight_statsd::{MetricsError, StatsdClient, StatsdClientOptions, Writer};
use parking_lot::Mutex;
use std::io;
use std::net::UdpSocket;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// UDP side
// ============================================================================

/// A loopback UDP server standing in for the agent.
pub struct DummyStatsdServer {
    socket: UdpSocket,
}

impl DummyStatsdServer {
    pub fn new() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("couldn't bind to address");
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("set_read_timeout failed");
        Self { socket }
    }

    pub fn port(&self) -> u16 {
        self.socket.local_addr().unwrap().port()
    }

    /// Receives one datagram.
    pub fn wait_for_message(&self) -> String {
        let mut buf = [0; 10000];
        let (number_of_bytes, _) = self.socket.recv_from(&mut buf).expect("Expected udp message");
        String::from_utf8(buf[..number_of_bytes].to_vec()).unwrap()
    }

    /// Receives datagrams until `expected_lines` metric lines arrived.
    pub fn wait_for_lines(&self, expected_lines: usize) -> Vec<String> {
        let mut lines = Vec::new();
        while lines.len() < expected_lines {
            let message = self.wait_for_message();
            lines.extend(message.split('\n').map(str::to_string));
        }
        lines
    }
}

/// Creates a UDP client pointed at `port` on loopback.
pub fn create_client(port: u16, prefix: &str, constant_tags: &[&str]) -> StatsdClient {
    let options = StatsdClientOptions {
        prefix: prefix.to_string(),
        host: "127.0.0.1".to_string(),
        port,
        constant_tags: constant_tags.iter().map(|tag| (*tag).to_string()).collect(),
        ..StatsdClientOptions::default()
    };
    StatsdClient::new(options).unwrap()
}

// ============================================================================
// Custom writer side
// ============================================================================

/// A writer that keeps every datagram in memory.
#[derive(Clone, Default)]
pub struct CapturingWriter {
    packets: Arc<Mutex<Vec<String>>>,
    closed: Arc<Mutex<bool>>,
}

impl CapturingWriter {
    pub fn packets(&self) -> Vec<String> {
        self.packets.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.packets
            .lock()
            .iter()
            .flat_map(|packet| packet.split('\n'))
            .map(str::to_string)
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }
}

impl Writer for CapturingWriter {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.packets
            .lock()
            .push(String::from_utf8(buf.to_vec()).unwrap());
        Ok(buf.len())
    }

    fn close(&self) -> io::Result<()> {
        *self.closed.lock() = true;
        Ok(())
    }
}

/// An error handler that records the display form of every error.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    errors: Arc<Mutex<Vec<String>>>,
}

impl RecordingHandler {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

impl insight_statsd::ErrorHandler for RecordingHandler {
    fn handle(&self, error: &MetricsError) {
        self.errors.lock().push(error.to_string());
    }
}

/// Options for a custom-writer client with a short poll timeout.
pub fn writer_options(prefix: &str, handler: &RecordingHandler) -> StatsdClientOptions {
    StatsdClientOptions {
        prefix: prefix.to_string(),
        host: "test".to_string(),
        port: 8251,
        error_handler: Arc::new(handler.clone()),
        poll_timeout: Duration::from_millis(10),
        ..StatsdClientOptions::default()
    }
}

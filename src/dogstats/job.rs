use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::Receiver;
use crossbeam::select;
use tracing::{debug, trace};

use super::handler::ErrorHandler;
use super::writer::{PacketWriter, Writer};
use crate::MetricsError;

/// The consumer side of the dispatch queue. Lives on its own thread and is the only owner
/// of the packet buffer and the transport.
pub(crate) struct DispatchJob<T> {
    packet: PacketWriter<T>,
    handler: Arc<dyn ErrorHandler>,
}

impl<T: Writer> DispatchJob<T> {
    pub fn new(packet: PacketWriter<T>, handler: Arc<dyn ErrorHandler>) -> Self {
        Self { packet, handler }
    }

    /// Runs until `shutdown` disconnects (or every line sender is gone), then drains the
    /// lines queued at that moment and releases the transport. A transport closed from
    /// outside ends the loop at once and nothing more is sent.
    pub fn run(mut self, lines: &Receiver<String>, shutdown: &Receiver<()>, poll_timeout: Duration) {
        debug!("Metrics dispatch started.");

        while !self.packet.is_closed() {
            select! {
                recv(lines) -> line => match line {
                    Ok(line) => self.process_line(&line, lines),
                    Err(_) => break,
                },
                recv(shutdown) -> _ => break,
                default(poll_timeout) => trace!("No metric line within poll timeout."),
            }
        }

        self.drain(lines);
        if let Err(err) = self.packet.close() {
            self.report(&err);
        }

        debug!("Metrics dispatch stopped.");
    }

    fn process_line(&mut self, line: &str, lines: &Receiver<String>) {
        if self.packet.would_overflow(line.len()) {
            self.flush();
        }
        if let Err(err) = self.packet.push_line(line) {
            self.report(&err);
        }

        // racy by nature, a late arrival only costs one extra datagram
        if lines.is_empty() {
            self.flush();
        }
    }

    fn drain(&mut self, lines: &Receiver<String>) {
        if self.packet.is_closed() {
            debug!(dropped = lines.len(), "Transport already closed, dropping queued metric lines.");
            return;
        }
        let pending = lines.len();
        if pending > 0 {
            debug!(pending, "Draining queued metric lines before shutdown.");
        }
        for line in lines.try_iter().take(pending) {
            self.process_line(&line, lines);
        }
        self.flush();
    }

    fn flush(&mut self) {
        match self.packet.flush() {
            Ok(0) => {}
            Ok(sent) => trace!(bytes = sent, "Flushed metrics packet."),
            Err(err) => self.report(&err),
        }
    }

    fn report(&self, err: &MetricsError) {
        debug!(error = %err, "Error sending metrics.");
        self.handler.handle(err);
    }
}

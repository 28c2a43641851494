use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{MetricResult, MetricsError};

/// A datagram transport.
///
/// Implement this trait to send packets somewhere other than a UDP socket, for example to
/// capture them in tests. Every call to [`write`](Writer::write) carries one complete
/// packet of newline-joined metric lines.
///
/// [`close`](Writer::close) may be called from another thread while a `write` is still in
/// progress, when shutdown gives up waiting for the dispatch thread. It is called at most
/// once per client and no `write` starts after it.
pub trait Writer: Send + Sync {
    /// Sends one datagram and returns the number of bytes the transport accepted.
    ///
    /// # Errors
    /// Returns an I/O error when the datagram could not be handed to the transport.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Releases the transport.
    ///
    /// # Errors
    /// Returns an I/O error when the transport could not be released cleanly.
    fn close(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<T> Writer for Box<T>
where
    T: Writer + ?Sized,
{
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn close(&self) -> io::Result<()> {
        (**self).close()
    }
}

impl<T> Writer for Arc<T>
where
    T: Writer + ?Sized,
{
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn close(&self) -> io::Result<()> {
        (**self).close()
    }
}

/// Sends datagrams from an unbound UDP socket to one fixed remote address.
#[derive(Debug)]
pub struct UdpSocketWriter {
    sock: RwLock<Option<UdpSocket>>,
    destination_addr: SocketAddr,
}

impl UdpSocketWriter {
    /// Resolves `addr` once and opens a socket on an unspecified local address of the
    /// same family. IPv4 results are preferred when the name resolves to both families.
    ///
    /// # Errors
    /// Returns [`MetricsError::Configuration`] when the address does not resolve or the
    /// socket cannot be opened.
    pub fn connect<A: ToSocketAddrs>(addr: A) -> MetricResult<Self> {
        let resolved: Vec<SocketAddr> = addr
            .to_socket_addrs()
            .map_err(|err| MetricsError::configuration("cannot resolve remote address", err))?
            .collect();
        let destination_addr = resolved
            .iter()
            .find(|candidate| candidate.is_ipv4())
            .or_else(|| resolved.first())
            .copied()
            .ok_or_else(|| {
                MetricsError::configuration(
                    "cannot resolve remote address",
                    io::Error::new(io::ErrorKind::NotFound, "no address found"),
                )
            })?;

        let bind_addr = if destination_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let sock = UdpSocket::bind(bind_addr)
            .map_err(|err| MetricsError::configuration("cannot open datagram socket", err))?;

        Ok(Self::from_socket(sock, destination_addr))
    }

    /// Wraps an already opened socket.
    #[must_use]
    pub fn from_socket(sock: UdpSocket, destination_addr: SocketAddr) -> Self {
        Self {
            sock: RwLock::new(Some(sock)),
            destination_addr,
        }
    }

    /// The resolved remote address.
    #[must_use]
    pub const fn destination(&self) -> SocketAddr {
        self.destination_addr
    }
}

impl Writer for UdpSocketWriter {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let sock = self.sock.read();
        let Some(sock) = sock.as_ref() else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "socket closed"));
        };
        let r = sock.send_to(buf, self.destination_addr);
        if let Err(ref err) = r {
            tracing::warn!("UDP send error: {err}");
        }
        r
    }

    fn close(&self) -> io::Result<()> {
        drop(self.sock.write().take());
        Ok(())
    }
}

/// Shared by the dispatch thread and the client, so either side can release the writer.
///
/// Closes the inner writer once and refuses every send after that.
pub(crate) struct Transport<T> {
    writer: T,
    closed: AtomicBool,
}

impl<T: Writer> Transport<T> {
    pub const fn new(writer: T) -> Self {
        Self {
            writer,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub const fn inner(&self) -> &T {
        &self.writer
    }
}

impl<T: Writer> Writer for Transport<T> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        if self.is_closed() {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "transport closed"));
        }
        self.writer.write(buf)
    }

    fn close(&self) -> io::Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.writer.close()
    }
}

/// The send buffer: complete lines joined by `\n`, never larger than one datagram.
///
/// Owned by the dispatch thread only.
pub(crate) struct PacketWriter<T> {
    max_packet_size: usize,
    transport: Arc<Transport<T>>,
    destination: String,
    current_transmit: String,
}

impl<T: Writer> PacketWriter<T> {
    pub fn new(writer: T, destination: String, max_packet_size: usize) -> Self {
        Self {
            max_packet_size,
            transport: Arc::new(Transport::new(writer)),
            destination,
            current_transmit: String::with_capacity(max_packet_size),
        }
    }

    /// A handle that can close the transport from outside the dispatch thread.
    pub fn transport(&self) -> Arc<Transport<T>> {
        Arc::clone(&self.transport)
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    /// Whether appending `line_len` bytes, plus a separator, would overflow the datagram.
    pub fn would_overflow(&self, line_len: usize) -> bool {
        let separator = usize::from(!self.current_transmit.is_empty());
        self.current_transmit.len() + separator + line_len > self.max_packet_size
    }

    /// Appends a line. The caller flushes first when [`would_overflow`](Self::would_overflow)
    /// says so.
    pub fn push_line(&mut self, line: &str) -> MetricResult<()> {
        if line.len() > self.max_packet_size {
            return Err(MetricsError::LineTooLarge {
                len: line.len(),
                max: self.max_packet_size,
            });
        }
        if self.would_overflow(line.len()) {
            return Err(format!("Packet buffer is full, cannot append {} bytes", line.len()).into());
        }

        if !self.current_transmit.is_empty() {
            self.current_transmit.push('\n');
        }
        self.current_transmit.push_str(line);
        Ok(())
    }

    /// Sends the buffered lines as one datagram and empties the buffer, whatever the outcome.
    pub fn flush(&mut self) -> MetricResult<usize> {
        if self.current_transmit.is_empty() {
            return Ok(0);
        }

        let expected = self.current_transmit.len();
        let result = self.transport.write(self.current_transmit.as_bytes());
        self.current_transmit.clear();

        let sent = result?;
        if sent != expected {
            return Err(MetricsError::PartialSend {
                sent,
                expected,
                destination: self.destination.clone(),
            });
        }
        Ok(sent)
    }

    pub fn close(&self) -> MetricResult<()> {
        self.transport.close().map_err(Into::into)
    }

    #[cfg(test)]
    pub fn buffered(&self) -> &str {
        &self.current_transmit
    }
}

//! Delivery of rendered syslog lines to one remote collector.
//!
//! A [`Sender`] owns at most one connection to a fixed `(protocol, host, port)`.
//! It connects eagerly, reconnects once on demand when it has no live connection,
//! and never retries a failed write.
//!
//! # TLS
//!
//! TLS connections accept **any** server certificate and host name. This tool
//! produces test traffic for collectors that usually run with self-signed
//! certificates; it must not be used to carry data that needs confidentiality.

use std::fmt;
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::str::FromStr;
use std::time::{Duration, Instant};

use native_tls::{TlsConnector, TlsStream};

use crate::config::Target;
use crate::{Error, Result};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Protocol {
    #[default]
    Udp,
    Tcp,
    Tls,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Udp => "udp",
            Protocol::Tcp => "tcp",
            Protocol::Tls => "tls",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(Protocol::Udp),
            "tcp" => Ok(Protocol::Tcp),
            "tls" => Ok(Protocol::Tls),
            _ => Err(Error::UnsupportedProtocol(s.to_string())),
        }
    }
}

/// Timeouts applied by a [`Sender`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SenderOptions {
    pub connect_timeout: Duration,
    /// Applied to TCP and TLS writes so a stalled peer cannot block forever.
    pub write_timeout: Duration,
}

impl Default for SenderOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

enum Connection {
    Udp(UdpSocket),
    Tcp(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl Connection {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Connection::Udp(socket) => {
                let sent = socket.send(buf)?;
                if sent == buf.len() {
                    Ok(())
                } else {
                    Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("datagram truncated: {sent} of {} bytes", buf.len()),
                    ))
                }
            }
            Connection::Tcp(stream) => stream.write_all(buf),
            Connection::Tls(stream) => stream.write_all(buf),
        }
    }

    fn close(self) -> io::Result<()> {
        match self {
            Connection::Udp(_) => Ok(()),
            Connection::Tcp(stream) => stream.shutdown(Shutdown::Both),
            Connection::Tls(mut stream) => stream.shutdown(),
        }
    }
}

/// A peer that already went away is not a close failure.
fn shutdown_result(result: io::Result<()>) -> Result<()> {
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
        other => other.map_err(Error::Io),
    }
}

/// Owner of one outbound connection to a syslog collector.
pub struct Sender {
    protocol: Protocol,
    host: String,
    port: u16,
    options: SenderOptions,
    conn: Option<Connection>,
}

impl fmt::Debug for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("protocol", &self.protocol)
            .field("addr", &self.addr())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Sender {
    /// Connect to `host:port` with default timeouts.
    pub fn new(protocol: Protocol, host: impl Into<String>, port: u16) -> Result<Self> {
        Self::with_options(protocol, host, port, SenderOptions::default())
    }

    pub fn connect(target: &Target) -> Result<Self> {
        Self::new(target.protocol, target.host.clone(), target.port)
    }

    /// Connect immediately. Fails with [`Error::Connect`] if the destination cannot
    /// be resolved, or for TCP/TLS, cannot be reached within `connect_timeout`.
    pub fn with_options(
        protocol: Protocol,
        host: impl Into<String>,
        port: u16,
        options: SenderOptions,
    ) -> Result<Self> {
        let mut sender = Self {
            protocol,
            host: host.into(),
            port,
            options,
            conn: None,
        };
        sender.reconnect()?;
        Ok(sender)
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Deliver one line.
    ///
    /// Reconnects once first if there is no live connection. A `\n` is appended
    /// unless `text` already ends with one. A failed write drops the connection,
    /// so the next call starts with a fresh one.
    pub fn send(&mut self, text: &str) -> Result<()> {
        if self.conn.is_none() {
            tracing::debug!(addr = %self.addr(), protocol = %self.protocol, "reconnecting");
            self.reconnect()?;
        }

        let mut payload = String::with_capacity(text.len() + 1);
        payload.push_str(text);
        if !payload.ends_with('\n') {
            payload.push('\n');
        }

        let Some(conn) = self.conn.as_mut() else {
            return Err(self.send_error(io::ErrorKind::NotConnected.into()));
        };
        if let Err(err) = conn.write_all(payload.as_bytes()) {
            self.conn = None;
            return Err(self.send_error(err));
        }
        Ok(())
    }

    /// Close the connection if there is one. Safe to call repeatedly.
    ///
    /// A failed shutdown is reported as [`Error::Io`]; the connection is gone either way.
    pub fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => shutdown_result(conn.close()),
            None => Ok(()),
        }
    }

    fn reconnect(&mut self) -> Result<()> {
        let conn = self.open().map_err(|source| Error::Connect {
            addr: self.addr(),
            source,
        })?;
        tracing::debug!(addr = %self.addr(), protocol = %self.protocol, "connected");
        self.conn = Some(conn);
        Ok(())
    }

    /// Dial, and for TLS handshake, within one `connect_timeout` budget.
    fn open(&self) -> io::Result<Connection> {
        let deadline = Instant::now() + self.options.connect_timeout;
        match self.protocol {
            Protocol::Udp => self.connect_udp().map(Connection::Udp),
            Protocol::Tcp => self.connect_tcp(deadline).map(Connection::Tcp),
            Protocol::Tls => {
                let stream = self.connect_tcp(deadline)?;
                let connector = insecure_connector()?;
                let budget = remaining(deadline).ok_or_else(|| self.timed_out())?;
                stream.set_read_timeout(Some(budget))?;
                let stream = connector
                    .connect(&self.host, stream)
                    .map_err(io::Error::other)?;
                stream.get_ref().set_read_timeout(None)?;
                Ok(Connection::Tls(Box::new(stream)))
            }
        }
    }

    fn socket_addrs(&self) -> io::Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port).to_socket_addrs()?.collect();
        if addrs.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no addresses found for {}", self.host),
            ));
        }
        Ok(addrs)
    }

    fn connect_udp(&self) -> io::Result<UdpSocket> {
        let addr = self.socket_addrs()?[0];
        let local: SocketAddr = if addr.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(local)?;
        socket.connect(addr)?;
        Ok(socket)
    }

    fn connect_tcp(&self, deadline: Instant) -> io::Result<TcpStream> {
        let mut last_err = None;
        for addr in self.socket_addrs()? {
            let Some(budget) = remaining(deadline) else {
                return Err(self.timed_out());
            };
            match TcpStream::connect_timeout(&addr, budget) {
                Ok(stream) => {
                    stream.set_write_timeout(Some(self.options.write_timeout))?;
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(err) => {
                    tracing::debug!(%addr, error = %err, "connect attempt failed");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| self.timed_out()))
    }

    fn timed_out(&self) -> io::Error {
        io::Error::new(
            io::ErrorKind::TimedOut,
            format!("unable to connect to {}", self.addr()),
        )
    }

    fn send_error(&self, source: io::Error) -> Error {
        Error::Send {
            addr: self.addr(),
            source,
        }
    }
}

/// Time left before `deadline`, or `None` once it has passed.
fn remaining(deadline: Instant) -> Option<Duration> {
    deadline
        .checked_duration_since(Instant::now())
        .filter(|left| !left.is_zero())
}

fn insecure_connector() -> io::Result<TlsConnector> {
    TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_parse() {
        assert_eq!("UDP".parse::<Protocol>().unwrap(), Protocol::Udp);
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert_eq!("Tls".parse::<Protocol>().unwrap(), Protocol::Tls);
        assert!(matches!(
            "sctp".parse::<Protocol>(),
            Err(Error::UnsupportedProtocol(p)) if p == "sctp"
        ));
    }

    #[test]
    fn close_is_idempotent() {
        let mut sender = Sender::new(Protocol::Udp, "127.0.0.1", 9).unwrap();
        assert!(sender.is_connected());
        sender.close().unwrap();
        sender.close().unwrap();
        assert!(!sender.is_connected());
    }

    #[test]
    fn remaining_budget() {
        assert_eq!(remaining(Instant::now()), None);
        let left = remaining(Instant::now() + Duration::from_secs(5)).unwrap();
        assert!(left <= Duration::from_secs(5));
        assert!(left > Duration::from_secs(4));
    }

    #[test]
    fn shutdown_failure_is_io_error() {
        assert!(shutdown_result(Err(io::ErrorKind::NotConnected.into())).is_ok());

        let err = shutdown_result(Err(io::ErrorKind::BrokenPipe.into())).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert!(!err.to_string().contains("send"), "{err}");
    }

    #[test]
    fn unresolvable_host_is_connect_error() {
        let err = Sender::new(Protocol::Udp, "no-such-host.invalid", 514).unwrap_err();
        assert!(matches!(err, Error::Connect { .. }));
    }
}

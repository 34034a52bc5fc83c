//! Shared mock connection for transport tests.

use std::cell::RefCell;
use std::rc::Rc;

use cloudlink::network::error::Error;
use cloudlink::network::tls::TlsContext;
use cloudlink::network::{
    Close, ConfigureTimeout, ConfigureTls, Connect, Connection, Read, SecureConnection, Write,
};
use cloudlink::transport::https::{HttpsConnection, Method};

/// What the connection observed. Kept behind a shared handle because the
/// lifecycle consumes the connection and closes it when a body stream is
/// drained.
#[derive(Debug, Default)]
pub struct Trace {
    pub written: Vec<u8>,
    pub tls_server_name: Option<String>,
    pub read_timeout_ms: Option<u32>,
    pub closed: bool,
}

pub struct MockConnection {
    incoming: Vec<u8>,
    read_pos: usize,
    chunk: usize,
    reject_tls: bool,
    trace: Rc<RefCell<Trace>>,
}

impl MockConnection {
    /// A connection that will answer the request with `response`.
    pub fn with_response(response: &[u8]) -> Self {
        Self {
            incoming: response.to_vec(),
            read_pos: 0,
            chunk: usize::MAX,
            reject_tls: false,
            trace: Rc::new(RefCell::new(Trace::default())),
        }
    }

    /// Hand out at most `chunk` bytes per read, simulating a jittery link.
    pub fn chunked(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    /// Refuse any TLS context.
    pub fn rejecting_tls(mut self) -> Self {
        self.reject_tls = true;
        self
    }

    pub fn trace(&self) -> Rc<RefCell<Trace>> {
        Rc::clone(&self.trace)
    }
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.read_pos >= self.incoming.len() {
            return Ok(0);
        }
        let remaining = self.incoming.len() - self.read_pos;
        let len = buf.len().min(remaining).min(self.chunk);
        buf[..len].copy_from_slice(&self.incoming[self.read_pos..self.read_pos + len]);
        self.read_pos += len;
        Ok(len)
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.trace.borrow_mut().written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        self.trace.borrow_mut().closed = true;
        Ok(())
    }
}

impl ConfigureTls for MockConnection {
    type Error = Error;

    fn install_tls(&mut self, context: &TlsContext<'_>) -> Result<(), Self::Error> {
        if self.reject_tls {
            return Err(Error::TlsError);
        }
        self.trace.borrow_mut().tls_server_name = Some(context.server_name.to_string());
        Ok(())
    }
}

impl ConfigureTimeout for MockConnection {
    fn set_read_timeout(&mut self, millis: u32) {
        self.trace.borrow_mut().read_timeout_ms = Some(millis);
    }
}

impl Connection for MockConnection {}
impl SecureConnection for MockConnection {}

pub struct MockConnector {
    connection: Option<MockConnection>,
    refuse: bool,
    pub last_remote: Option<String>,
}

impl MockConnector {
    pub fn new(connection: MockConnection) -> Self {
        Self {
            connection: Some(connection),
            refuse: false,
            last_remote: None,
        }
    }

    /// A connector that refuses every attempt.
    pub fn refusing() -> Self {
        Self {
            connection: None,
            refuse: true,
            last_remote: None,
        }
    }
}

impl Connect for MockConnector {
    type Connection = MockConnection;
    type Error = Error;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        self.last_remote = Some(remote.to_string());
        if self.refuse {
            return Err(Error::ConnectionRefused);
        }
        self.connection.take().ok_or(Error::NotOpen)
    }
}

/// Open a lifecycle against a scripted response and keep the trace handle.
pub fn lifecycle_with_response(
    url: &str,
    method: Method,
    response: &[u8],
) -> (HttpsConnection<MockConnection>, Rc<RefCell<Trace>>) {
    let connection = MockConnection::with_response(response);
    let trace = connection.trace();
    let mut connector = MockConnector::new(connection);
    let lifecycle = HttpsConnection::open(&mut connector, url, method).expect("open failed");
    (lifecycle, trace)
}

pub fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|window| *window == needle)
        .count()
}

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::network::error::Error;
use crate::network::tls::TlsContext;
use crate::network::{Connect, Connection, SecureConnection};
use crate::transport::error::{MAX_ERROR_MESSAGE_LEN, TransportError, TransportErrorKind};

const MAX_HEADERS: usize = 16;
const MAX_HEADER_NAME_LEN: usize = 64;
const MAX_HEADER_VALUE_LEN: usize = 256;
const MAX_HEADER_VALUES: usize = 8;
const MAX_AUTHORITY_LEN: usize = 128;
const MAX_PATH_LEN: usize = 256;
const MAX_REQUEST_HEAD_LEN: usize = 2048;
const MAX_RESPONSE_HEAD_LEN: usize = 2048;
const MAX_BODY_LEN: usize = 2048;
const MAX_RESPONSE_BODY_LEN: usize = 2048;

/// HTTPS request methods, serialized verbatim as uppercase wire tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
}

impl Method {
    /// The method token as sent on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }

    /// Whether a request body may accompany this method.
    pub const fn allows_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }
}

/// Lifecycle state of an exchange. Transitions only move forward:
/// `Configured -> Connected -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Constructed; the request may still be mutated. Nothing has been sent.
    Configured,
    /// The request was sent and a response head received.
    Connected,
    /// A body stream was fully drained and the connection released.
    Closed,
}

/// A single request header field.
#[derive(Debug, Clone)]
pub struct Header {
    /// Field name; matched ASCII-case-insensitively, last write wins.
    pub name: String<MAX_HEADER_NAME_LEN>,
    /// Field value; passed through without validation.
    pub value: String<MAX_HEADER_VALUE_LEN>,
}

/// A response header field with all values received for it, in arrival order.
#[derive(Debug, Clone)]
pub struct ResponseHeader {
    /// Field name as first received from the peer.
    pub name: String<MAX_HEADER_NAME_LEN>,
    /// Every value received for this field, in arrival order.
    pub values: Vec<String<MAX_HEADER_VALUE_LEN>, MAX_HEADER_VALUES>,
}

/// One outbound HTTPS exchange.
///
/// An instance is single-use: construct it with [`open`](Self::open), shape
/// the request with the setters, send it with [`connect`](Self::connect), and
/// read the outcome. Construction obtains the underlying network handle from
/// the given connector but sends nothing; the staged body and headers only
/// hit the wire inside `connect`.
///
/// Mutation-time invariant violations fail with a classified
/// [`TransportError`]; the blocking I/O operations surface the ambient
/// [`Error`] unclassified.
pub struct HttpsConnection<C: SecureConnection> {
    connection: Option<C>,
    authority: String<MAX_AUTHORITY_LEN>,
    path: String<MAX_PATH_LEN>,
    method: Method,
    headers: Vec<Header, MAX_HEADERS>,
    body: Vec<u8, MAX_BODY_LEN>,
    read_timeout_ms: u32,
    state: State,
    status: Option<u16>,
    response_headers: Vec<ResponseHeader, MAX_HEADERS>,
    content_length: Option<usize>,
    pending: Vec<u8, MAX_RESPONSE_BODY_LEN>,
}

impl<C: SecureConnection> HttpsConnection<C> {
    /// Open an exchange against `url` with an initial method.
    ///
    /// The URL scheme must be `https` (ASCII case-insensitive), otherwise
    /// construction fails with [`TransportErrorKind::InvalidTarget`]. The
    /// connector supplies the underlying network handle; a failure to open it
    /// classifies as [`TransportErrorKind::RetryableConnection`], since
    /// connection establishment failures are presumed transient.
    ///
    /// Opening the handle sends nothing: the request goes out on
    /// [`connect`](Self::connect).
    pub fn open<N>(connector: &mut N, url: &str, method: Method) -> Result<Self, TransportError>
    where
        N: Connect<Connection = C>,
    {
        let target = parse_target(url)?;
        let connection = connector.connect(&target.remote).map_err(|_| {
            TransportError::with_message_and_cause(
                TransportErrorKind::RetryableConnection,
                "could not open a connection to the target",
                Error::ConnectionRefused,
            )
        })?;

        Ok(Self {
            connection: Some(connection),
            authority: target.authority,
            path: target.path,
            method,
            headers: Vec::new(),
            body: Vec::new(),
            read_timeout_ms: 0,
            state: State::Configured,
            status: None,
            response_headers: Vec::new(),
            content_length: None,
            pending: Vec::new(),
        })
    }

    /// Change the request method.
    ///
    /// Rejected with [`TransportErrorKind::InvalidState`] when a non-empty
    /// body is already staged and the new method forbids one (switching away
    /// from POST/PUT would otherwise silently drop the body), or when the
    /// request has already been sent. The staged body is untouched by a
    /// failed call.
    pub fn set_method(&mut self, method: Method) -> Result<(), TransportError> {
        if self.state != State::Configured {
            return Err(TransportError::with_message(
                TransportErrorKind::InvalidState,
                "method cannot change once the request was sent",
            ));
        }
        if !method.allows_body() && !self.body.is_empty() {
            return Err(TransportError::with_message(
                TransportErrorKind::InvalidState,
                "cannot switch away from POST or PUT while a body is staged",
            ));
        }
        self.method = method;
        Ok(())
    }

    /// Set a request header field. The last write for a field name wins;
    /// names match ASCII-case-insensitively. Values are not validated here.
    pub fn set_header(&mut self, field: &str, value: &str) -> Result<(), TransportError> {
        let value = String::try_from(value).map_err(|_| {
            TransportError::with_message(TransportErrorKind::InvalidArgument, "header value too long")
        })?;
        if let Some(existing) = self
            .headers
            .iter_mut()
            .find(|header| header.name.eq_ignore_ascii_case(field))
        {
            existing.value = value;
            return Ok(());
        }
        let name = String::try_from(field).map_err(|_| {
            TransportError::with_message(TransportErrorKind::InvalidArgument, "header name too long")
        })?;
        self.headers.push(Header { name, value }).map_err(|_| {
            TransportError::with_message(
                TransportErrorKind::InvalidArgument,
                "request header table is full",
            )
        })?;
        Ok(())
    }

    /// Set the read timeout handed to the connection at connect time.
    /// `0` means wait indefinitely. Calling this after connect stores the
    /// value but has no further effect.
    pub fn set_read_timeout(&mut self, millis: u32) {
        self.read_timeout_ms = millis;
    }

    /// Stage the request body.
    ///
    /// A non-empty body is only accepted while the method allows one
    /// (`POST`/`PUT`); otherwise the call fails with
    /// [`TransportErrorKind::InvalidState`]. The bytes are copied, so the
    /// caller's buffer may be reused or mutated afterwards without affecting
    /// what [`connect`](Self::connect) sends.
    pub fn write_body(&mut self, body: &[u8]) -> Result<(), TransportError> {
        if !self.method.allows_body() {
            if body.is_empty() {
                return Ok(());
            }
            return Err(TransportError::with_message(
                TransportErrorKind::InvalidState,
                "cannot stage a body for a method that forbids one",
            ));
        }
        self.body.clear();
        self.body.extend_from_slice(body).map_err(|_| {
            TransportError::with_message(
                TransportErrorKind::InvalidArgument,
                "request body exceeds the staging buffer",
            )
        })?;
        Ok(())
    }

    /// Install a TLS context on the underlying connection for the handshake.
    ///
    /// Must be called, if at all, before [`connect`](Self::connect). An empty
    /// context is rejected with [`TransportErrorKind::InvalidArgument`].
    pub fn set_tls_context(&mut self, context: &TlsContext<'_>) -> Result<(), TransportError> {
        if context.is_empty() {
            return Err(TransportError::with_message(
                TransportErrorKind::InvalidArgument,
                "TLS context must not be empty",
            ));
        }
        if self.state != State::Configured {
            return Err(TransportError::with_message(
                TransportErrorKind::InvalidState,
                "TLS context must be installed before connect",
            ));
        }
        let connection = self.connection.as_mut().ok_or_else(|| {
            TransportError::with_message(TransportErrorKind::InvalidState, "connection is closed")
        })?;
        connection.install_tls(context).map_err(|_| {
            TransportError::with_message_and_cause(
                TransportErrorKind::InvalidArgument,
                "TLS context was rejected by the connection",
                Error::TlsError,
            )
        })
    }

    /// Send the request and receive the response head.
    ///
    /// Streams the staged body (if any) after the serialized request head,
    /// flushes, then blocks until the status line and headers are parsed.
    /// Failures surface as the ambient [`Error`] without classification;
    /// wrapping them for a retry policy is the caller's decision.
    ///
    /// Single-use: once an exchange was sent, a second call is rejected.
    pub fn connect(&mut self) -> Result<(), Error> {
        if self.state != State::Configured {
            return Err(Error::NotOpen);
        }
        let head = self.build_request_head()?;
        let connection = self.connection.as_mut().ok_or(Error::NotOpen)?;
        connection.set_read_timeout(self.read_timeout_ms);

        write_all(connection, &head)?;
        if !self.body.is_empty() {
            write_all(connection, &self.body)?;
        }
        connection.flush().map_err(|_| Error::WriteError)?;

        // --- Receive Response Head ---
        let mut response_buf = [0u8; MAX_RESPONSE_HEAD_LEN];
        let mut total_read = 0;
        let head_end = loop {
            if let Some(pos) = find_slice(&response_buf[..total_read], b"\r\n\r\n") {
                break pos;
            }
            if total_read == response_buf.len() {
                return Err(Error::ProtocolError);
            }
            match connection.read(&mut response_buf[total_read..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => total_read += n,
                Err(_) => return Err(Error::ReadError),
            }
        };

        self.parse_response_head(&response_buf[..head_end])?;

        // Bytes read past the head already belong to the body; keep them for
        // the readers.
        self.pending.clear();
        self.pending
            .extend_from_slice(&response_buf[head_end + 4..total_read])
            .map_err(|_| Error::ProtocolError)?;

        self.state = State::Connected;
        Ok(())
    }

    /// Read the success-path response body.
    ///
    /// Available once after a successful [`connect`](Self::connect): the body
    /// is read fully into memory and the connection is released before the
    /// call returns, on success and failure paths both. Fails with the
    /// ambient [`Error`] when the success channel is unavailable: the peer
    /// reported an error status, or the exchange is already closed.
    pub fn read_response_body(&mut self) -> Result<Vec<u8, MAX_RESPONSE_BODY_LEN>, Error> {
        if self.state != State::Connected {
            return Err(Error::NotOpen);
        }
        let status = self.status.ok_or(Error::NotOpen)?;
        if status >= 400 {
            // The payload lives on the error path; see `read_error_body`.
            return Err(Error::ReadError);
        }
        let drained = self.drain_body();
        self.release_connection();
        drained
    }

    /// Read the failure-path response body.
    ///
    /// When the peer signaled no error condition (no response yet, or a
    /// success status), this returns an empty byte sequence rather than
    /// failing. Otherwise the error payload is read fully and the connection
    /// released, mirroring [`read_response_body`](Self::read_response_body).
    pub fn read_error_body(&mut self) -> Result<Vec<u8, MAX_RESPONSE_BODY_LEN>, Error> {
        if !matches!(self.status, Some(status) if status >= 400) {
            return Ok(Vec::new());
        }
        if self.state != State::Connected {
            return Err(Error::NotOpen);
        }
        let drained = self.drain_body();
        self.release_connection();
        drained
    }

    /// The numeric response status.
    ///
    /// Fails with the ambient [`Error`] when no response was ever received;
    /// stays available after the body streams were drained and closed.
    pub fn status_code(&self) -> Result<u16, Error> {
        self.status.ok_or(Error::NotOpen)
    }

    /// The response headers: one entry per field name, every received value
    /// in arrival order. Empty before a response was received.
    pub fn response_headers(&self) -> &[ResponseHeader] {
        &self.response_headers
    }

    /// The values received for one response header field, if any.
    pub fn response_header_values(
        &self,
        name: &str,
    ) -> Option<&[String<MAX_HEADER_VALUE_LEN>]> {
        self.response_headers
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.values.as_slice())
    }

    /// The current request method.
    pub const fn method(&self) -> Method {
        self.method
    }

    /// The current lifecycle state.
    pub const fn state(&self) -> State {
        self.state
    }

    fn build_request_head(&self) -> Result<Vec<u8, MAX_REQUEST_HEAD_LEN>, Error> {
        let mut head: Vec<u8, MAX_REQUEST_HEAD_LEN> = Vec::new();
        let overflow = |_| Error::WriteError;

        head.extend_from_slice(self.method.as_str().as_bytes())
            .map_err(overflow)?;
        head.push(b' ').map_err(|_| Error::WriteError)?;
        head.extend_from_slice(self.path.as_bytes()).map_err(overflow)?;
        head.extend_from_slice(b" HTTP/1.1\r\n").map_err(overflow)?;

        let mut has_host = false;
        for header in &self.headers {
            if header.name.eq_ignore_ascii_case("Host") {
                has_host = true;
            }
            head.extend_from_slice(header.name.as_bytes()).map_err(overflow)?;
            head.extend_from_slice(b": ").map_err(overflow)?;
            head.extend_from_slice(header.value.as_bytes()).map_err(overflow)?;
            head.extend_from_slice(b"\r\n").map_err(overflow)?;
        }

        if !has_host {
            head.extend_from_slice(b"Host: ").map_err(overflow)?;
            head.extend_from_slice(self.authority.as_bytes()).map_err(overflow)?;
            head.extend_from_slice(b"\r\n").map_err(overflow)?;
        }

        if !self.body.is_empty() {
            let mut length: String<10> = String::new();
            write!(length, "{}", self.body.len()).map_err(|_| Error::WriteError)?;
            head.extend_from_slice(b"Content-Length: ").map_err(overflow)?;
            head.extend_from_slice(length.as_bytes()).map_err(overflow)?;
            head.extend_from_slice(b"\r\n").map_err(overflow)?;
        }

        head.extend_from_slice(b"\r\n").map_err(overflow)?;
        Ok(head)
    }

    fn parse_response_head(&mut self, head: &[u8]) -> Result<(), Error> {
        let text = core::str::from_utf8(head).map_err(|_| Error::ProtocolError)?;
        let mut lines = text.lines();

        let status_line = lines.next().ok_or(Error::ProtocolError)?;
        let mut parts = status_line.splitn(3, ' ');
        let version = parts.next().ok_or(Error::ProtocolError)?;
        if !version.starts_with("HTTP/") {
            return Err(Error::ProtocolError);
        }
        let status = parts
            .next()
            .ok_or(Error::ProtocolError)?
            .parse::<u16>()
            .map_err(|_| Error::ProtocolError)?;

        self.response_headers.clear();
        self.content_length = None;

        for line in lines {
            if line.is_empty() {
                continue;
            }
            let mut kv = line.splitn(2, ':');
            let name = kv.next().ok_or(Error::ProtocolError)?.trim();
            let value = kv.next().ok_or(Error::ProtocolError)?.trim();

            if name.eq_ignore_ascii_case("Content-Length") {
                self.content_length = value.parse::<usize>().ok();
            }

            let value = String::try_from(value).map_err(|_| Error::ProtocolError)?;
            if let Some(entry) = self
                .response_headers
                .iter_mut()
                .find(|entry| entry.name.eq_ignore_ascii_case(name))
            {
                entry.values.push(value).map_err(|_| Error::ProtocolError)?;
            } else {
                let mut values = Vec::new();
                values.push(value).map_err(|_| Error::ProtocolError)?;
                self.response_headers
                    .push(ResponseHeader {
                        name: String::try_from(name).map_err(|_| Error::ProtocolError)?,
                        values,
                    })
                    .map_err(|_| Error::ProtocolError)?;
            }
        }

        self.status = Some(status);
        Ok(())
    }

    fn drain_body(&mut self) -> Result<Vec<u8, MAX_RESPONSE_BODY_LEN>, Error> {
        let mut body: Vec<u8, MAX_RESPONSE_BODY_LEN> = Vec::new();
        body.extend_from_slice(&self.pending)
            .map_err(|_| Error::ProtocolError)?;
        self.pending.clear();

        let connection = self.connection.as_mut().ok_or(Error::NotOpen)?;

        if let Some(expected) = self.content_length {
            while body.len() < expected {
                if body.len() == body.capacity() {
                    return Err(Error::ProtocolError);
                }
                let mut chunk = [0u8; 256];
                let want = (expected - body.len()).min(chunk.len());
                match connection.read(&mut chunk[..want]) {
                    // Closed before the declared length arrived.
                    Ok(0) => return Err(Error::ConnectionClosed),
                    Ok(n) => body
                        .extend_from_slice(&chunk[..n])
                        .map_err(|_| Error::ProtocolError)?,
                    Err(_) => return Err(Error::ReadError),
                }
            }
            body.truncate(expected);
        } else {
            // No declared length: the peer signals the end by closing.
            loop {
                let mut chunk = [0u8; 256];
                match connection.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => body
                        .extend_from_slice(&chunk[..n])
                        .map_err(|_| Error::ProtocolError)?,
                    Err(_) => return Err(Error::ReadError),
                }
            }
        }

        Ok(body)
    }

    fn release_connection(&mut self) {
        self.state = State::Closed;
        if let Some(connection) = self.connection.take() {
            let _ = connection.close();
        }
    }
}

impl<C: SecureConnection> core::fmt::Debug for HttpsConnection<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpsConnection")
            .field("authority", &self.authority)
            .field("method", &self.method)
            .field("state", &self.state)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

struct Target {
    authority: String<MAX_AUTHORITY_LEN>,
    remote: String<MAX_AUTHORITY_LEN>,
    path: String<MAX_PATH_LEN>,
}

fn parse_target(url: &str) -> Result<Target, TransportError> {
    let invalid = |message: &str| TransportError::with_message(TransportErrorKind::InvalidTarget, message);

    let (scheme, rest) = url.split_once("://").ok_or_else(|| invalid("URL has no scheme"))?;
    if !scheme.eq_ignore_ascii_case("https") {
        let mut message: String<MAX_ERROR_MESSAGE_LEN> = String::new();
        let _ = write!(message, "expected URL scheme https but got '{scheme}'");
        return Err(invalid(&message));
    }

    let (authority, rest_path) = match rest.split_once('/') {
        Some((authority, path)) => (authority, path),
        None => (rest, ""),
    };
    if authority.is_empty() {
        return Err(invalid("URL has no host"));
    }

    let authority_owned =
        String::try_from(authority).map_err(|_| invalid("URL host too long"))?;

    let mut remote: String<MAX_AUTHORITY_LEN> = String::new();
    if authority.contains(':') {
        remote.push_str(authority).map_err(|_| invalid("URL host too long"))?;
    } else {
        remote.push_str(authority).map_err(|_| invalid("URL host too long"))?;
        remote.push_str(":443").map_err(|_| invalid("URL host too long"))?;
    }

    let mut path: String<MAX_PATH_LEN> = String::new();
    path.push('/').map_err(|_| invalid("URL path too long"))?;
    path.push_str(rest_path).map_err(|_| invalid("URL path too long"))?;

    Ok(Target {
        authority: authority_owned,
        remote,
        path,
    })
}

fn write_all<C: Connection>(connection: &mut C, mut buf: &[u8]) -> Result<(), Error> {
    while !buf.is_empty() {
        match connection.write(buf) {
            Ok(0) => return Err(Error::WriteError),
            Ok(n) => buf = &buf[n.min(buf.len())..],
            Err(_) => return Err(Error::WriteError),
        }
    }
    Ok(())
}

/// Finds the first occurrence of a slice in another slice and returns its
/// starting position.
fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

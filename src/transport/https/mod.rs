//! HTTPS exchange lifecycle for device-to-cloud requests.
//!
//! This module manages exactly one outbound HTTPS request/response exchange,
//! from configuration through drained streams. The central type is
//! [`connection::HttpsConnection`], which works with any connection
//! implementing [`crate::network::SecureConnection`].
//!
//! # Design
//!
//! Platform HTTP stacks tend to finalize the method and open the connection
//! the instant the output channel is first written to, silently coercing the
//! request behind the caller's back. This lifecycle avoids that class of
//! surprise by making everything explicit:
//!
//! * The request body is buffered privately and only hits the wire inside
//!   [`connect`](connection::HttpsConnection::connect); no network activity
//!   happens before the explicit connect call.
//! * Method changes are validated against the staged body at mutation time;
//!   switching away from a body-carrying method after data was staged is
//!   rejected instead of silently dropping the body.
//! * The response streams are read fully and the connection released before a
//!   read operation returns, so no half-drained channel is ever left behind.
//!
//! Blocking I/O failures surface as the ambient
//! [`Error`](crate::network::error::Error) without classification; the caller
//! wraps them with [`TransportError`](crate::transport::error::TransportError)
//! when feeding a retry policy.

/// The HTTPS request lifecycle and supporting types.
pub mod connection;

pub use connection::{Header, HttpsConnection, Method, ResponseHeader, State};

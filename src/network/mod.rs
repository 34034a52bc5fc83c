//! A network abstraction layer for device-to-cloud clients
//!
//! This module defines the traits the transport layer is written against.
//! The crate never opens sockets itself: the surrounding firmware supplies a
//! [`Connect`] implementation ("the underlying network handle") and the
//! transport drives it through the blocking [`Read`], [`Write`] and [`Close`]
//! traits. HTTPS additionally needs a connection that can install a TLS
//! context before the handshake and bound its blocking reads, which is what
//! [`SecureConnection`] captures.

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// TLS context data installed on a connection before the handshake
pub mod tls;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{
        Close, ConfigureTimeout, ConfigureTls, Connect, Connection, Read, SecureConnection, Write,
    };
}

use tls::TlsContext;

// Core synchronous traits
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to a `host:port` remote
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}

/// ======================
/// HTTPS Capabilities
/// ======================

/// A connection that can have a TLS context installed before the handshake.
pub trait ConfigureTls {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Install the TLS context used for the next handshake
    fn install_tls(&mut self, context: &TlsContext<'_>) -> Result<(), Self::Error>;
}

/// A connection whose blocking reads can be bounded by a timeout.
///
/// The timeout is advisory: implementations apply it on a best-effort basis
/// and a value of `0` means "wait indefinitely".
pub trait ConfigureTimeout {
    fn set_read_timeout(&mut self, millis: u32);
}

/// The capability bundle an HTTPS exchange needs from its connection.
pub trait SecureConnection: Connection + ConfigureTls + ConfigureTimeout {}

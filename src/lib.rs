//! # cloudlink - Device-to-Cloud Transport Core
//!
//! The transport layer of a device-to-cloud connectivity client. This crate
//! owns the two pieces of that layer with real invariants: the lifecycle of a
//! single outbound HTTPS exchange, and the classification of low-level
//! transport failures into a retryable/non-retryable error taxonomy that an
//! external retry policy can act on. It is designed for embedded systems and
//! supports `no_std` environments.
//!
//! ## Features
//!
//! ### HTTPS Request Lifecycle
//! - One [`transport::https::HttpsConnection`] per exchange, with an explicit
//!   `Configured -> Connected -> Closed` state machine
//! - Method/body combinations validated at mutation time, never on the wire
//! - Request bodies buffered until connect, so no network activity happens
//!   before the explicit connect call
//! - Response status, multi-valued headers, and success/error bodies exposed
//!   once the blocking connect completes
//!
//! ### Transport Error Taxonomy
//! - [`transport::error::TransportError`] carries a fixed wire error code, a
//!   retryable flag, and the original lower-level failure as a chained cause
//! - Peer-signaled AMQP error conditions (for example
//!   `amqp:connection:framing-error`) preserved verbatim for log correlation
//! - Raw I/O failures classify as retryable; protocol-semantic violations as
//!   non-retryable
//!
//! ### Connection Agnostic
//! - Works with any transport implementing the [`network`] traits; TLS and
//!   read-timeout configuration go through the same seam
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! cloudlink = "0.1.0"
//! ```
//!
//! ### Sending a request
//!
//! ```rust,no_run
//! use cloudlink::transport::https::{HttpsConnection, Method};
//! # use cloudlink::network::error::Error;
//! # use cloudlink::network::tls::TlsContext;
//! # struct DeviceSocket;
//! # impl cloudlink::network::Read for DeviceSocket {
//! #     type Error = Error;
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl cloudlink::network::Write for DeviceSocket {
//! #     type Error = Error;
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl cloudlink::network::Close for DeviceSocket {
//! #     type Error = Error;
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl cloudlink::network::ConfigureTls for DeviceSocket {
//! #     type Error = Error;
//! #     fn install_tls(&mut self, _context: &TlsContext<'_>) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl cloudlink::network::ConfigureTimeout for DeviceSocket {
//! #     fn set_read_timeout(&mut self, _millis: u32) {}
//! # }
//! # impl cloudlink::network::Connection for DeviceSocket {}
//! # impl cloudlink::network::SecureConnection for DeviceSocket {}
//! # struct DeviceStack;
//! # impl cloudlink::network::Connect for DeviceStack {
//! #     type Connection = DeviceSocket;
//! #     type Error = Error;
//! #     fn connect(&mut self, _remote: &str) -> Result<Self::Connection, Self::Error> {
//! #         Ok(DeviceSocket)
//! #     }
//! # }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut stack = DeviceStack;
//! let mut request =
//!     HttpsConnection::open(&mut stack, "https://devices.example.com/twin", Method::Post)?;
//! request.set_header("Content-Type", "application/json")?;
//! request.set_read_timeout(5_000);
//! request.write_body(br#"{"reported":{"battery":87}}"#)?;
//! request.connect()?;
//!
//! let status = request.status_code()?;
//! let body = request.read_response_body()?;
//! # let _ = (status, body);
//! # Ok(())
//! # }
//! ```
//!
//! ### Classifying a failure
//!
//! ```rust
//! use cloudlink::network::error::Error;
//! use cloudlink::transport::error::TransportError;
//!
//! let classified = TransportError::from(Error::ConnectionRefused);
//! assert!(classified.is_retryable());
//! assert_eq!(classified.error_code(), "client:connection-failure");
//! ```
//!
//! ## Platform Support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.)
//! - Linux-based IoT devices (Raspberry Pi, etc.)
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt logging support for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]
#![doc(html_root_url = "https://docs.rs/cloudlink")]

/// Network abstraction layer: the connection seam the transport builds on.
///
/// Defines the blocking `Read`/`Write`/`Close` traits, the `Connect` entry
/// point for opening a network handle, and the TLS/timeout capabilities an
/// HTTPS-grade connection must provide.
pub mod network;

/// Transport layer: the HTTPS request lifecycle and the transport error
/// taxonomy consumed by an external retry policy.
pub mod transport;

//! Transport layer for device-to-cloud exchanges.
//!
//! Two independent pieces live here, composed by an outer transport client:
//!
//! * [`https`] owns one outbound HTTPS request/response exchange from
//!   configuration through drained streams.
//! * [`error`] classifies low-level failure signals (I/O failures, TLS
//!   failures, peer-signaled AMQP error conditions) into a typed taxonomy
//!   carrying a retryable flag for an external retry policy.
//!
//! The split mirrors their failure semantics: lifecycle operations that
//! violate an invariant fail immediately with a classified
//! [`error::TransportError`], while the blocking I/O calls surface the
//! ambient [`crate::network::error::Error`] unclassified; wrapping those is
//! the caller's decision, typically via `TransportError::from`.

/// Transport error taxonomy with retryable classification
pub mod error;

/// Single-request HTTPS exchange lifecycle
pub mod https;

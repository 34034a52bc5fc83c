//! Transport error taxonomy.
//!
//! Every failure the transport layer can raise is classified into a
//! [`TransportError`]: a closed set of kinds, each carrying a fixed wire
//! error-code string, a retryable flag, and optionally the lower-level
//! [`Error`](crate::network::error::Error) that triggered it. The retryable
//! flag is what an external retry policy keys on; the error code exists for
//! protocol-compliant diagnostics and log correlation, never for control
//! flow.
//!
//! Classification policy:
//!
//! * Validation failures (`InvalidTarget`, `InvalidState`, `InvalidArgument`)
//!   mean the request shape is wrong. Resending without change is futile, so
//!   they are never retryable.
//! * Raw I/O failures (`RetryableConnection`) are presumed transient
//!   (connection refused, reset, timeout) and default to retryable.
//! * Peer-signaled protocol violations (`Protocol`) mean the peer explicitly
//!   rejected something about the exchange; they default to non-retryable and
//!   preserve the wire condition string verbatim (for example
//!   `amqp:connection:framing-error`).

use heapless::String;

use crate::network::error::Error;

/// Longest detail message a classified error retains. Longer messages are
/// truncated at a character boundary.
pub const MAX_ERROR_MESSAGE_LEN: usize = 96;

/// A wire-protocol violation signaled by the peer, or detected while parsing
/// the peer's output.
///
/// One variant per wire error condition; adding a newly-observed condition is
/// adding one variant here plus its code string below. The AMQP condition
/// strings are defined by the AMQP 1.0 core specification and must be
/// preserved verbatim for interoperability with AMQP-speaking peers and log
/// tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// The peer's response could not be parsed.
    MalformedResponse,
    /// Frame boundaries or structure were malformed (`amqp:connection:framing-error`).
    AmqpFramingError,
    /// The peer closed the connection on purpose (`amqp:connection:forced`).
    AmqpConnectionForced,
    /// The peer redirected the connection elsewhere (`amqp:connection:redirect`).
    AmqpConnectionRedirect,
    /// The peer hit an internal error (`amqp:internal-error`).
    AmqpInternalError,
    /// The addressed node does not exist (`amqp:not-found`).
    AmqpNotFound,
    /// The client is not authorized for the operation (`amqp:unauthorized-access`).
    AmqpUnauthorizedAccess,
    /// The peer could not decode sent data (`amqp:decode-error`).
    AmqpDecodeError,
    /// A peer resource limit was exceeded (`amqp:resource-limit-exceeded`).
    AmqpResourceLimitExceeded,
    /// The operation is forbidden by the peer (`amqp:not-allowed`).
    AmqpNotAllowed,
    /// The peer does not implement the operation (`amqp:not-implemented`).
    AmqpNotImplemented,
    /// A precondition for the operation failed (`amqp:precondition-failed`).
    AmqpPreconditionFailed,
    /// The peer considers the operation illegal in its current state (`amqp:illegal-state`).
    AmqpIllegalState,
}

impl ProtocolViolation {
    /// The fixed wire error-condition string for this violation.
    pub const fn condition(&self) -> &'static str {
        match self {
            ProtocolViolation::MalformedResponse => "client:malformed-response",
            ProtocolViolation::AmqpFramingError => "amqp:connection:framing-error",
            ProtocolViolation::AmqpConnectionForced => "amqp:connection:forced",
            ProtocolViolation::AmqpConnectionRedirect => "amqp:connection:redirect",
            ProtocolViolation::AmqpInternalError => "amqp:internal-error",
            ProtocolViolation::AmqpNotFound => "amqp:not-found",
            ProtocolViolation::AmqpUnauthorizedAccess => "amqp:unauthorized-access",
            ProtocolViolation::AmqpDecodeError => "amqp:decode-error",
            ProtocolViolation::AmqpResourceLimitExceeded => "amqp:resource-limit-exceeded",
            ProtocolViolation::AmqpNotAllowed => "amqp:not-allowed",
            ProtocolViolation::AmqpNotImplemented => "amqp:not-implemented",
            ProtocolViolation::AmqpPreconditionFailed => "amqp:precondition-failed",
            ProtocolViolation::AmqpIllegalState => "amqp:illegal-state",
        }
    }

    /// Look up a peer-signaled wire condition string.
    ///
    /// Returns `None` for conditions outside the taxonomy; `client:` codes
    /// are local and never arrive from a peer.
    pub fn from_condition(condition: &str) -> Option<Self> {
        match condition {
            "amqp:connection:framing-error" => Some(ProtocolViolation::AmqpFramingError),
            "amqp:connection:forced" => Some(ProtocolViolation::AmqpConnectionForced),
            "amqp:connection:redirect" => Some(ProtocolViolation::AmqpConnectionRedirect),
            "amqp:internal-error" => Some(ProtocolViolation::AmqpInternalError),
            "amqp:not-found" => Some(ProtocolViolation::AmqpNotFound),
            "amqp:unauthorized-access" => Some(ProtocolViolation::AmqpUnauthorizedAccess),
            "amqp:decode-error" => Some(ProtocolViolation::AmqpDecodeError),
            "amqp:resource-limit-exceeded" => Some(ProtocolViolation::AmqpResourceLimitExceeded),
            "amqp:not-allowed" => Some(ProtocolViolation::AmqpNotAllowed),
            "amqp:not-implemented" => Some(ProtocolViolation::AmqpNotImplemented),
            "amqp:precondition-failed" => Some(ProtocolViolation::AmqpPreconditionFailed),
            "amqp:illegal-state" => Some(ProtocolViolation::AmqpIllegalState),
            _ => None,
        }
    }
}

/// The closed set of transport error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The target URL does not use the secure HTTP scheme.
    InvalidTarget,
    /// A method/body combination was violated at mutation time, or an
    /// operation was attempted outside its valid lifecycle state.
    InvalidState,
    /// A required argument (for example a TLS context) was missing or
    /// unusable.
    InvalidArgument,
    /// An I/O failure while opening, sending or receiving. Presumed
    /// transient.
    RetryableConnection,
    /// The peer signaled a protocol-level violation.
    Protocol(ProtocolViolation),
}

impl TransportErrorKind {
    /// The fixed error-code string identifying this kind.
    ///
    /// Peer-signaled conditions use their verbatim wire strings; locally
    /// raised kinds use the `client:` namespace.
    pub const fn error_code(&self) -> &'static str {
        match self {
            TransportErrorKind::InvalidTarget => "client:invalid-target",
            TransportErrorKind::InvalidState => "client:invalid-state",
            TransportErrorKind::InvalidArgument => "client:invalid-argument",
            TransportErrorKind::RetryableConnection => "client:connection-failure",
            TransportErrorKind::Protocol(violation) => violation.condition(),
        }
    }

    /// Whether failures of this kind are presumed transient.
    pub const fn retryable_by_default(&self) -> bool {
        matches!(self, TransportErrorKind::RetryableConnection)
    }
}

impl core::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.error_code())
    }
}

/// A classified transport failure.
///
/// Immutable after construction: the kind, the retryable flag and the chained
/// cause are fixed at the point the lower-level failure is detected.
///
/// # Examples
///
/// ```rust
/// use cloudlink::transport::error::{ProtocolViolation, TransportError, TransportErrorKind};
///
/// let framing = TransportError::new(TransportErrorKind::Protocol(
///     ProtocolViolation::AmqpFramingError,
/// ));
/// assert_eq!(framing.error_code(), "amqp:connection:framing-error");
/// assert!(!framing.is_retryable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    kind: TransportErrorKind,
    message: Option<String<MAX_ERROR_MESSAGE_LEN>>,
    cause: Option<Error>,
    retryable: bool,
}

impl TransportError {
    /// Classify a failure where the error code alone is diagnostic.
    pub fn new(kind: TransportErrorKind) -> Self {
        Self {
            kind,
            message: None,
            cause: None,
            retryable: kind.retryable_by_default(),
        }
    }

    /// Classify a failure with additional context, for example which field
    /// failed validation.
    pub fn with_message(kind: TransportErrorKind, message: &str) -> Self {
        Self {
            message: Some(truncated(message)),
            ..Self::new(kind)
        }
    }

    /// Classify a failure with context and the lower-level failure that
    /// triggered it.
    pub fn with_message_and_cause(kind: TransportErrorKind, message: &str, cause: Error) -> Self {
        Self {
            message: Some(truncated(message)),
            cause: Some(cause),
            ..Self::new(kind)
        }
    }

    /// Classify a lower-level failure without further context.
    pub fn with_cause(kind: TransportErrorKind, cause: Error) -> Self {
        Self {
            cause: Some(cause),
            ..Self::new(kind)
        }
    }

    /// Classify a wire error-condition string signaled by a peer.
    ///
    /// Returns `None` when the condition is outside the taxonomy; callers
    /// usually fall back to [`TransportErrorKind::RetryableConnection`] or
    /// surface the raw condition in their own diagnostics.
    pub fn from_peer_condition(condition: &str) -> Option<Self> {
        ProtocolViolation::from_condition(condition)
            .map(|violation| Self::new(TransportErrorKind::Protocol(violation)))
    }

    /// The taxonomy kind.
    pub const fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    /// The fixed wire error-code string.
    pub const fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    /// Whether this failure is presumed transient and safe to retry
    /// unchanged. Set once at construction.
    pub const fn is_retryable(&self) -> bool {
        self.retryable
    }

    /// The wrapped lower-level failure, if any.
    pub fn cause(&self) -> Option<Error> {
        self.cause
    }

    /// Additional context recorded at the failure site, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.error_code())?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if self.retryable {
            f.write_str(" (retryable)")?;
        }
        Ok(())
    }
}

impl core::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause as &(dyn core::error::Error + 'static))
    }
}

/// Ambient I/O failures classify onto the taxonomy: raw I/O kinds are
/// presumed transient, malformed peer output is a protocol violation, and a
/// bad address is a target problem. The original failure is always kept as
/// the cause.
impl From<Error> for TransportError {
    fn from(err: Error) -> Self {
        let kind = match err {
            Error::ProtocolError => {
                TransportErrorKind::Protocol(ProtocolViolation::MalformedResponse)
            }
            Error::InvalidAddress => TransportErrorKind::InvalidTarget,
            _ => TransportErrorKind::RetryableConnection,
        };
        Self::with_cause(kind, err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{=str} (retryable: {=bool}, cause: {})",
            self.error_code(),
            self.retryable,
            self.cause
        );
    }
}

fn truncated(message: &str) -> String<MAX_ERROR_MESSAGE_LEN> {
    let mut out = String::new();
    for ch in message.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

//! TLS context data for secure connections.
//!
//! The transport layer never performs a handshake itself; it hands a
//! [`TlsContext`] to the underlying connection through
//! [`ConfigureTls`](super::ConfigureTls) and leaves certificate handling to
//! the platform's TLS stack. The context borrows its material from the
//! caller, matching how device firmware typically keeps certificates in
//! flash.

/// Borrowed TLS configuration installed on a connection before the handshake.
///
/// # Examples
///
/// ```rust
/// use cloudlink::network::tls::TlsContext;
///
/// // Typically an `include_bytes!` of a bundle kept in flash.
/// static ROOT_CA: &[u8] = b"-----BEGIN CERTIFICATE-----\n...";
///
/// let context = TlsContext::new("devices.example.com", ROOT_CA);
/// assert!(!context.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlsContext<'a> {
    /// Expected server name, used for SNI and peer verification.
    pub server_name: &'a str,
    /// Trust anchors (PEM or DER bundle) the peer certificate must chain to.
    pub trust_anchors: &'a [u8],
    /// Optional client identity (certificate plus key material) for mutual TLS.
    pub client_identity: Option<&'a [u8]>,
}

impl<'a> TlsContext<'a> {
    /// Create a context from a server name and a trust anchor bundle.
    pub fn new(server_name: &'a str, trust_anchors: &'a [u8]) -> Self {
        Self {
            server_name,
            trust_anchors,
            client_identity: None,
        }
    }

    /// Attach a client identity for mutual TLS.
    pub fn with_client_identity(mut self, identity: &'a [u8]) -> Self {
        self.client_identity = Some(identity);
        self
    }

    /// A context with no server name and no trust anchors carries nothing a
    /// handshake could use.
    pub fn is_empty(&self) -> bool {
        self.server_name.is_empty() && self.trust_anchors.is_empty() && self.client_identity.is_none()
    }
}

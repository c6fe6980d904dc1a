//! Unified error type for the FireWall client.

use firewall_protocol::{ProtocolError, RegistryError};
use firewall_session::SessionError;
use firewall_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum FirewallError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The protocol declarations are inconsistent.
    #[error("invalid protocol schema: {0}")]
    Registry(#[from] RegistryError),

    /// The session ended abnormally (rejected token).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The client configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let firewall_err: FirewallError = err.into();
        assert!(matches!(firewall_err, FirewallError::Transport(_)));
        assert!(firewall_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AuthFailed("nope".into());
        let firewall_err: FirewallError = err.into();
        assert!(matches!(firewall_err, FirewallError::Session(_)));
        assert_eq!(firewall_err.to_string(), "authentication failed: nope");
    }

    #[test]
    fn test_from_registry_error() {
        let err = RegistryError::DuplicateType("Vector");
        let firewall_err: FirewallError = err.into();
        assert!(matches!(firewall_err, FirewallError::Registry(_)));
        assert!(firewall_err.to_string().starts_with("invalid protocol schema"));
    }

    #[test]
    fn test_from_config_error() {
        let firewall_err: FirewallError = ConfigError::MissingToken.into();
        assert!(matches!(firewall_err, FirewallError::Config(_)));
    }
}

//! Error types for cloud-config-resolver.

/// Result type alias for cloud-config-resolver operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while resolving a cloud configuration.
///
/// Every variant except [`ConfigError::OptionalFetch`] aborts the resolution.
/// Optional fetch failures are logged and the affected field is left empty.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The `authentication` parameter names a mode the provider does not know.
    #[error("{provider} authentication failed: the authentication parameter value {value} may be incorrect")]
    AuthSelection {
        /// Provider ecosystem that rejected the value
        provider: &'static str,
        /// The offending `authentication` value
        value: String,
    },

    /// The selected authentication mode is missing required parameters.
    #[error("Authentication failed: {0}")]
    AuthBuild(String),

    /// The mandatory configuration payload could not be retrieved.
    #[error("Failed to retrieve configuration from Centralized Configuration Provider: {0}")]
    PrimaryFetch(String),

    /// An optional configuration entry could not be retrieved.
    #[error("Optional configuration entry unavailable: {0}")]
    OptionalFetch(String),

    /// A vault or secret bundle lookup failed.
    #[error("Failed to resolve secret: {0}")]
    SecretResolution(String),

    /// The resolved wallet is not PEM encoded.
    #[error("Invalid wallet content format. Supported format is PEM")]
    WalletFormat,

    /// The provider reference or location could not be parsed.
    #[error("Invalid configuration provider reference: {0}")]
    InvalidReference(String),

    /// No client factory was registered for the requested provider kind.
    #[error("Configuration provider '{0}' has no registered client factory")]
    ProviderNotRegistered(String),

    /// Attempted to use a provider kind whose feature is not enabled.
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(&'static str),

    /// The OCI profile file could not be loaded.
    #[error("OCI profile error: {0}")]
    Profile(String),

    /// Failed to deserialize a configuration payload.
    #[error("Failed to deserialize configuration: {0}")]
    DeserializationError(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Error reported by an external cloud client (config store, vault, object storage).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClientError {
    /// HTTP-like status code, when the service reported one
    pub status: Option<u16>,
    /// Human readable description
    pub message: String,
}

impl ClientError {
    /// Create a client error without a status code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Create a client error carrying a status code.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a "not found" (404) client error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(404, message)
    }

    /// Whether the service reported that the requested item does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_selection_message_includes_value() {
        let err = ConfigError::AuthSelection {
            provider: "Azure",
            value: "KERBEROS".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("KERBEROS"));
        assert!(msg.starts_with("Azure"));
    }

    #[test]
    fn test_client_error_not_found() {
        assert!(ClientError::not_found("missing").is_not_found());
        assert!(!ClientError::with_status(500, "boom").is_not_found());
        assert!(!ClientError::new("timeout").is_not_found());
    }
}

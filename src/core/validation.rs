//! Validation of resolved configuration.

use crate::core::ConfigObject;
use crate::error::{ConfigError, Result};

const PEM_MARKER: &str = "-----BEGIN";

/// Trait for validating a resolved configuration before it is handed out.
///
/// # Examples
///
/// ```rust
/// use cloud_config_resolver::core::{ConfigObject, Validate};
///
/// let mut config = ConfigObject::new();
/// config.wallet_content = Some("not-pem-data".to_string());
/// assert!(config.validate().is_err());
/// ```
pub trait Validate {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first fatal validation failure.
    fn validate(&self) -> Result<()>;
}

impl Validate for ConfigObject {
    fn validate(&self) -> Result<()> {
        match self.wallet_content.as_deref() {
            Some(wallet) if !wallet.is_empty() => validate_wallet(wallet),
            _ => Ok(()),
        }
    }
}

/// Whether `content` starts with a PEM armor line.
pub fn is_pem(content: &str) -> bool {
    content.trim_start().starts_with(PEM_MARKER)
}

/// Reject wallets that are not PEM encoded.
///
/// # Errors
///
/// Returns [`ConfigError::WalletFormat`] for any non-PEM content.
pub fn validate_wallet(content: &str) -> Result<()> {
    if is_pem(content) {
        Ok(())
    } else {
        Err(ConfigError::WalletFormat)
    }
}

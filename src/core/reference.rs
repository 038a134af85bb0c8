//! Parsing of `config-<kind>://<location>?<extended>` provider references.

use crate::error::{ConfigError, Result};
use std::fmt;
use std::str::FromStr;

const REFERENCE_PREFIX: &str = "config-";

/// The kind of cloud configuration provider a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Azure App Configuration store
    Azure,
    /// Single Azure Key Vault secret holding a configuration document
    AzureVault,
    /// OCI Object Storage object
    OciObject,
    /// OCI vault secret holding a configuration document
    OciVault,
    /// Local JSON file
    File,
}

impl ProviderKind {
    /// The kind's name as it appears in a reference.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Azure => "azure",
            Self::AzureVault => "azurevault",
            Self::OciObject => "ociobject",
            Self::OciVault => "ocivault",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "azure" => Ok(Self::Azure),
            "azurevault" => Ok(Self::AzureVault),
            "ociobject" => Ok(Self::OciObject),
            "ocivault" => Ok(Self::OciVault),
            "file" => Ok(Self::File),
            other => Err(ConfigError::InvalidReference(format!(
                "unknown provider kind '{}'",
                other
            ))),
        }
    }
}

/// A parsed provider reference.
///
/// # Examples
///
/// ```rust
/// use cloud_config_resolver::core::{ProviderKind, ProviderReference};
///
/// let reference: ProviderReference =
///     "config-azure://myappconfig.azconfig.io?key=sales/&label=prod".parse().unwrap();
/// assert_eq!(reference.kind, ProviderKind::Azure);
/// assert_eq!(reference.location, "myappconfig.azconfig.io");
/// assert_eq!(reference.extended, "key=sales/&label=prod");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReference {
    /// Provider kind
    pub kind: ProviderKind,
    /// Provider-specific location (store name, URL, object path or file path)
    pub location: String,
    /// Query-string-like parameters, without the leading `?`
    pub extended: String,
}

impl ProviderReference {
    /// Whether `s` looks like a provider reference rather than a plain connect string.
    pub fn is_reference(s: &str) -> bool {
        s.trim()
            .get(..REFERENCE_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(REFERENCE_PREFIX))
            && s.contains("://")
    }
}

impl FromStr for ProviderReference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if !Self::is_reference(trimmed) {
            return Err(ConfigError::InvalidReference(format!(
                "expected config-<kind>://<location>, got '{}'",
                trimmed
            )));
        }

        let rest = &trimmed[REFERENCE_PREFIX.len()..];
        let (kind, rest) = rest.split_once("://").ok_or_else(|| {
            ConfigError::InvalidReference(format!("missing '://' in '{}'", trimmed))
        })?;
        let kind = kind.parse::<ProviderKind>()?;

        let (location, extended) = rest.split_once('?').unwrap_or((rest, ""));
        if location.is_empty() {
            return Err(ConfigError::InvalidReference(format!(
                "missing location in '{}'",
                trimmed
            )));
        }

        Ok(Self {
            kind,
            location: location.to_string(),
            extended: extended.to_string(),
        })
    }
}

//! Classification of secret-bearing configuration values.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use serde_json::Value;

/// A raw configuration value after an attempted JSON parse.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Not valid JSON; the text is the value itself
    Literal(String),
    /// Valid JSON
    Parsed(Value),
}

impl RawValue {
    /// Try to parse `raw` as JSON, falling back to a literal.
    pub fn classify(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::Parsed(value),
            Err(_) => Self::Literal(raw.to_string()),
        }
    }

    /// The `uri` member of a parsed object, if any.
    pub fn vault_uri(&self) -> Option<&str> {
        match self {
            Self::Parsed(Value::Object(map)) => map
                .get("uri")
                .and_then(Value::as_str)
                .filter(|uri| !uri.is_empty()),
            _ => None,
        }
    }
}

/// Inline Azure service principal embedded next to an Azure vault reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InlineAzureAuth {
    /// Directory (tenant) id
    #[serde(default)]
    pub azure_tenant_id: Option<String>,
    /// Application (client) id
    #[serde(default)]
    pub azure_client_id: Option<String>,
    /// Client secret
    #[serde(default)]
    pub azure_client_secret: Option<String>,
    /// Path to a client certificate
    #[serde(default)]
    pub azure_client_certificate_path: Option<String>,
}

/// A secret field in a configuration document, routed by its `type` member.
#[derive(Debug, Clone, PartialEq)]
pub enum SecretReference {
    /// The value itself
    Literal(String),
    /// Secret stored in Azure Key Vault at `uri`
    AzureVault {
        /// Vault secret URL
        uri: String,
        /// Credentials to reach the vault
        authentication: Option<InlineAzureAuth>,
    },
    /// Secret stored in an OCI vault
    OciVault {
        /// Secret OCID
        secret_id: String,
    },
    /// Base64 encoded inline value
    Base64(String),
}

impl SecretReference {
    /// Route a document field by its `type` discriminator.
    ///
    /// Returns `Ok(None)` for a null field. Objects with an unknown or missing
    /// `type` are literals: their string `value` if they carry one, otherwise
    /// their JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SecretResolution`] when a vault reference has no
    /// string `value`, or when its `authentication` member is malformed.
    pub fn from_value(field: &str, value: &Value) -> Result<Option<Self>> {
        let map = match value {
            Value::Null => return Ok(None),
            Value::String(s) => return Ok(Some(Self::Literal(s.clone()))),
            Value::Object(map) => map,
            other => return Ok(Some(Self::Literal(other.to_string()))),
        };

        let kind = map
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_lowercase);
        let inner = map.get("value").and_then(Value::as_str);

        let require_value = || {
            inner.map(str::to_string).ok_or_else(|| {
                ConfigError::SecretResolution(format!(
                    "'{}' vault reference has no value",
                    field
                ))
            })
        };

        let reference = match kind.as_deref() {
            Some("azurevault" | "vault-azure" | "vaultazure") => {
                let authentication = map
                    .get("authentication")
                    .filter(|auth| !auth.is_null())
                    .map(|auth| InlineAzureAuth::deserialize(auth))
                    .transpose()
                    .map_err(|e| {
                        ConfigError::SecretResolution(format!(
                            "'{}' has malformed authentication: {}",
                            field, e
                        ))
                    })?;
                Self::AzureVault {
                    uri: require_value()?,
                    authentication,
                }
            }
            Some("ocivault" | "vault-oci" | "vaultoci") => Self::OciVault {
                secret_id: require_value()?,
            },
            Some("base64") => Self::Base64(require_value()?),
            _ => match inner {
                Some(text) => Self::Literal(text.to_string()),
                None => Self::Literal(value.to_string()),
            },
        };

        Ok(Some(reference))
    }
}

//! Azure credential selection.

use crate::core::{InlineAzureAuth, ParamStore};
use crate::error::{ConfigError, Result};
use std::fmt;

const AZURE_DEFAULT: &str = "AZURE_DEFAULT";
const AZURE_SERVICE_PRINCIPAL: &str = "AZURE_SERVICE_PRINCIPAL";
const AZURE_MANAGED_IDENTITY: &str = "AZURE_MANAGED_IDENTITY";

/// An Azure authentication strategy.
///
/// Client factories turn this description into a token source. A
/// [`AzureCredential::Chained`] credential tries its members in order and the
/// first that yields a token wins.
#[derive(Clone, PartialEq, Eq)]
pub enum AzureCredential {
    /// Service principal with a client secret
    ClientSecret {
        /// Directory (tenant) id
        tenant_id: Option<String>,
        /// Application (client) id
        client_id: Option<String>,
        /// Client secret
        client_secret: String,
    },
    /// Service principal with a client certificate
    ClientCertificate {
        /// Directory (tenant) id
        tenant_id: Option<String>,
        /// Application (client) id
        client_id: Option<String>,
        /// Path to the PEM certificate
        certificate_path: String,
    },
    /// Managed identity; `None` selects the system-assigned identity
    ManagedIdentity {
        /// User-assigned identity client id
        client_id: Option<String>,
    },
    /// Credentials taken from `AZURE_*` environment variables
    Environment,
    /// Ordered chain of credentials
    Chained(Vec<AzureCredential>),
}

impl fmt::Debug for AzureCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientSecret {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("ClientSecret")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
            Self::ClientCertificate {
                tenant_id,
                client_id,
                certificate_path,
            } => f
                .debug_struct("ClientCertificate")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("certificate_path", certificate_path)
                .finish(),
            Self::ManagedIdentity { client_id } => f
                .debug_struct("ManagedIdentity")
                .field("client_id", client_id)
                .finish(),
            Self::Environment => f.write_str("Environment"),
            Self::Chained(chain) => f.debug_tuple("Chained").field(chain).finish(),
        }
    }
}

/// Build the Azure credential selected by the `authentication` parameter.
///
/// - absent or `AZURE_DEFAULT`: a chain of every applicable strategy (client
///   secret, client certificate, managed identity) followed by the environment
///   credential.
/// - `AZURE_SERVICE_PRINCIPAL`: certificate if a path is given, else secret.
/// - `AZURE_MANAGED_IDENTITY`: managed identity, optionally user-assigned.
///
/// # Errors
///
/// - [`ConfigError::AuthBuild`] when a service principal has neither secret nor certificate
/// - [`ConfigError::AuthSelection`] for any other `authentication` value
pub fn resolve_azure_credential(params: &ParamStore) -> Result<AzureCredential> {
    let mode = params
        .get_non_empty("authentication")
        .map(str::to_uppercase);

    match mode.as_deref() {
        None | Some(AZURE_DEFAULT) => Ok(chained_credential(params)),
        Some(AZURE_SERVICE_PRINCIPAL) => service_principal(params),
        Some(AZURE_MANAGED_IDENTITY) => Ok(AzureCredential::ManagedIdentity {
            client_id: owned(params.get_non_empty("azure_managed_identity_client_id")),
        }),
        Some(other) => Err(ConfigError::AuthSelection {
            provider: "Azure",
            value: other.to_string(),
        }),
    }
}

/// Build a credential exclusively from an inline service principal.
///
/// No chain, environment or managed identity fallback is used. The client
/// secret takes priority over a certificate path.
///
/// # Errors
///
/// Returns [`ConfigError::AuthBuild`] if neither a secret nor a certificate path is given.
pub fn inline_azure_credential(auth: &InlineAzureAuth) -> Result<AzureCredential> {
    let tenant_id = non_empty(&auth.azure_tenant_id);
    let client_id = non_empty(&auth.azure_client_id);

    if let Some(secret) = non_empty(&auth.azure_client_secret) {
        Ok(AzureCredential::ClientSecret {
            tenant_id,
            client_id,
            client_secret: secret,
        })
    } else if let Some(path) = non_empty(&auth.azure_client_certificate_path) {
        Ok(AzureCredential::ClientCertificate {
            tenant_id,
            client_id,
            certificate_path: path,
        })
    } else {
        Err(ConfigError::AuthBuild(
            "Azure vault authentication requires either azure_client_secret or azure_client_certificate_path"
                .to_string(),
        ))
    }
}

fn chained_credential(params: &ParamStore) -> AzureCredential {
    let tenant_id = owned(params.get_non_empty("azure_tenant_id"));
    let client_id = owned(params.get_non_empty("azure_client_id"));
    let mut chain = Vec::new();

    if let Some(secret) = params.get_non_empty("azure_client_secret") {
        chain.push(AzureCredential::ClientSecret {
            tenant_id: tenant_id.clone(),
            client_id: client_id.clone(),
            client_secret: secret.to_string(),
        });
    }
    if let Some(path) = params.get_non_empty("azure_client_certificate_path") {
        chain.push(AzureCredential::ClientCertificate {
            tenant_id: tenant_id.clone(),
            client_id: client_id.clone(),
            certificate_path: path.to_string(),
        });
    }
    if let Some(identity) = params.get_non_empty("azure_managed_identity_client_id") {
        chain.push(AzureCredential::ManagedIdentity {
            client_id: Some(identity.to_string()),
        });
    }
    chain.push(AzureCredential::Environment);

    AzureCredential::Chained(chain)
}

fn service_principal(params: &ParamStore) -> Result<AzureCredential> {
    let tenant_id = owned(params.get_non_empty("azure_tenant_id"));
    let client_id = owned(params.get_non_empty("azure_client_id"));

    if let Some(path) = params.get_non_empty("azure_client_certificate_path") {
        Ok(AzureCredential::ClientCertificate {
            tenant_id,
            client_id,
            certificate_path: path.to_string(),
        })
    } else if let Some(secret) = params.get_non_empty("azure_client_secret") {
        Ok(AzureCredential::ClientSecret {
            tenant_id,
            client_id,
            client_secret: secret.to_string(),
        })
    } else {
        Err(ConfigError::AuthBuild(
            "Azure service principal authentication requires either a client certificate path or a client secret string"
                .to_string(),
        ))
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

//! Type-discriminated resolution of secret fields in configuration documents.

use crate::client::ClientFactories;
use crate::core::{ParamStore, SecretReference};
use crate::error::{ConfigError, Result};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde_json::Value;
use tracing::debug;

#[cfg(feature = "azure")]
use crate::core::InlineAzureAuth;
#[cfg(feature = "oci")]
use crate::auth::{OciCredential, resolve_oci_credential};
#[cfg(feature = "oci")]
use tokio::sync::OnceCell;

/// Resolves `password` and `wallet_location` style fields.
///
/// Literal values pass through. Vault references are fetched exactly once;
/// the fetched secret is returned as text and never treated as another
/// reference.
pub(crate) struct SecretResolver<'a> {
    #[cfg_attr(not(feature = "oci"), allow(dead_code))]
    params: &'a ParamStore,
    #[cfg_attr(not(any(feature = "azure", feature = "oci")), allow(dead_code))]
    factories: &'a ClientFactories,
    #[cfg(feature = "oci")]
    oci_credential: OnceCell<OciCredential>,
}

impl<'a> SecretResolver<'a> {
    pub(crate) fn new(params: &'a ParamStore, factories: &'a ClientFactories) -> Self {
        Self {
            params,
            factories,
            #[cfg(feature = "oci")]
            oci_credential: OnceCell::new(),
        }
    }

    /// Reuse an OCI credential the provider already built.
    #[cfg(feature = "oci")]
    pub(crate) fn with_oci_credential(mut self, credential: OciCredential) -> Self {
        self.oci_credential = OnceCell::new_with(Some(credential));
        self
    }

    /// Resolve one document field. `Ok(None)` means the field is null.
    pub(crate) async fn resolve(&self, field: &str, value: &Value) -> Result<Option<String>> {
        let Some(reference) = SecretReference::from_value(field, value)? else {
            return Ok(None);
        };

        let resolved = match reference {
            SecretReference::Literal(text) => text,
            SecretReference::Base64(encoded) => decode_base64_text(field, &encoded)?,
            SecretReference::AzureVault {
                uri,
                authentication,
            } => {
                debug!(field, "Resolving Azure vault reference");
                self.azure_vault(field, &uri, authentication.as_ref()).await?
            }
            SecretReference::OciVault { secret_id } => {
                debug!(field, "Resolving OCI vault reference");
                self.oci_vault(&secret_id).await?
            }
        };

        Ok(Some(resolved))
    }

    #[cfg(feature = "azure")]
    async fn azure_vault(
        &self,
        field: &str,
        uri: &str,
        authentication: Option<&InlineAzureAuth>,
    ) -> Result<String> {
        use crate::auth::inline_azure_credential;
        use crate::core::parse_vault_uri;
        use crate::sources::azure_vault::fetch_vault_secret;

        let authentication = authentication.ok_or_else(|| {
            ConfigError::AuthBuild(format!(
                "'{}' Azure vault reference requires an authentication object",
                field
            ))
        })?;
        let credential = inline_azure_credential(authentication)?;
        let location = parse_vault_uri(uri).ok_or_else(|| {
            ConfigError::SecretResolution(format!("'{}' is not an Azure vault secret URL", uri))
        })?;
        let factory = self.factories.require_azure("azure")?;

        fetch_vault_secret(factory.as_ref(), &credential, &location).await
    }

    #[cfg(not(feature = "azure"))]
    async fn azure_vault(
        &self,
        _field: &str,
        _uri: &str,
        _authentication: Option<&crate::core::InlineAzureAuth>,
    ) -> Result<String> {
        Err(ConfigError::FeatureNotEnabled("azure"))
    }

    #[cfg(feature = "oci")]
    async fn oci_vault(&self, secret_id: &str) -> Result<String> {
        use crate::sources::oci_vault::fetch_secret_bundle;

        let factory = self.factories.require_oci("ocivault")?;
        let credential = self
            .oci_credential
            .get_or_try_init(|| resolve_oci_credential(self.params))
            .await?;

        fetch_secret_bundle(factory.as_ref(), credential, secret_id).await
    }

    #[cfg(not(feature = "oci"))]
    async fn oci_vault(&self, _secret_id: &str) -> Result<String> {
        Err(ConfigError::FeatureNotEnabled("oci"))
    }
}

/// Decode base64 content into UTF-8 text.
pub(crate) fn decode_base64_text(what: &str, encoded: &str) -> Result<String> {
    let bytes = BASE64.decode(encoded.trim()).map_err(|e| {
        ConfigError::SecretResolution(format!("'{}' is not valid base64: {}", what, e))
    })?;
    String::from_utf8(bytes).map_err(|e| {
        ConfigError::SecretResolution(format!("'{}' is not valid UTF-8: {}", what, e))
    })
}

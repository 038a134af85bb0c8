//! OCI vault secret provider.

use super::ConfigProvider;
use super::document::{alias, assemble, parse_document, select_alias};
use super::secret_resolver::{SecretResolver, decode_base64_text};
use crate::auth::{OciCredential, resolve_oci_credential};
use crate::client::{ClientFactories, OciClientFactory};
use crate::core::{ConfigObject, ParamStore, ProviderKind};
use crate::error::{ClientError, ConfigError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

/// Reads a configuration document stored as an OCI vault secret.
///
/// The secret bundle is base64 decoded and parsed as JSON; the `key`
/// parameter selects one entry of a multi-entry document. Without an object
/// storage host, an inline API key takes its region from the `region`
/// parameter.
pub struct OciVaultProvider {
    secret_id: String,
    params: ParamStore,
    factories: ClientFactories,
    factory: Arc<dyn OciClientFactory>,
}

impl OciVaultProvider {
    /// Create a provider for the secret `secret_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProviderNotRegistered`] if no OCI factory is registered.
    pub fn new(secret_id: &str, extended: &str, factories: &ClientFactories) -> Result<Self> {
        Ok(Self {
            secret_id: secret_id.to_string(),
            params: ParamStore::parse(extended),
            factory: factories.require_oci(ProviderKind::OciVault.as_str())?,
            factories: factories.clone(),
        })
    }

    #[instrument(skip(self), fields(secret = %self.secret_id))]
    async fn load(&self) -> Result<ConfigObject> {
        let credential = resolve_oci_credential(&self.params).await?;

        let content = fetch_bundle(self.factory.as_ref(), &credential, &self.secret_id)
            .await
            .map_err(|e| ConfigError::PrimaryFetch(e.to_string()))?;
        let text = decode_base64_text(&self.secret_id, &content)
            .map_err(|e| ConfigError::PrimaryFetch(e.to_string()))?;

        let document = select_alias(parse_document(&text)?, alias(&self.params))?;
        let resolver =
            SecretResolver::new(&self.params, &self.factories).with_oci_credential(credential);
        let config = assemble(&document, &resolver).await?;

        info!("Resolved configuration from OCI vault");
        Ok(config)
    }
}

#[async_trait]
impl ConfigProvider for OciVaultProvider {
    async fn return_config(&self) -> Result<ConfigObject> {
        self.load().await
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OciVault
    }

    fn name(&self) -> String {
        format!("ocivault:{}", self.secret_id)
    }
}

async fn fetch_bundle(
    factory: &dyn OciClientFactory,
    credential: &OciCredential,
    secret_id: &str,
) -> std::result::Result<String, ClientError> {
    let client = factory.secrets_client(credential)?;
    Ok(client.get_secret_bundle(secret_id).await?.content)
}

/// Fetch and decode a secret referenced from inside a configuration.
pub(crate) async fn fetch_secret_bundle(
    factory: &dyn OciClientFactory,
    credential: &OciCredential,
    secret_id: &str,
) -> Result<String> {
    let content = fetch_bundle(factory, credential, secret_id)
        .await
        .map_err(|e| ConfigError::SecretResolution(format!("{}: {}", secret_id, e)))?;
    decode_base64_text(secret_id, &content)
}

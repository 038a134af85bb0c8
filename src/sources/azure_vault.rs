//! Azure Key Vault secret provider.

use super::ConfigProvider;
use super::document::{alias, assemble, select_alias};
use super::secret_resolver::SecretResolver;
use crate::auth::{AzureCredential, resolve_azure_credential};
use crate::client::{AzureClientFactory, ClientFactories};
use crate::core::{ConfigObject, ParamStore, ProviderKind, RawValue, VaultLocation, parse_vault_uri};
use crate::error::{ClientError, ConfigError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Fetches one secret from an Azure Key Vault.
///
/// The secret is either a plain value or a JSON document, optionally holding
/// several named entries selected by the `key` parameter.
pub struct AzureVaultProvider {
    location: VaultLocation,
    params: ParamStore,
    factories: ClientFactories,
    factory: Arc<dyn AzureClientFactory>,
}

impl AzureVaultProvider {
    /// Create a provider for the secret at `vault_url`
    /// (`[https://]<host>/secrets/<name>[/<version>]`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidReference`] if `vault_url` is not a vault
    /// secret URL and [`ConfigError::ProviderNotRegistered`] if no Azure factory
    /// is registered.
    pub fn new(vault_url: &str, extended: &str, factories: &ClientFactories) -> Result<Self> {
        let location = parse_vault_uri(vault_url).ok_or_else(|| {
            ConfigError::InvalidReference(format!("'{}' is not an Azure vault secret URL", vault_url))
        })?;

        Ok(Self {
            location,
            params: ParamStore::parse(extended),
            factory: factories.require_azure(ProviderKind::AzureVault.as_str())?,
            factories: factories.clone(),
        })
    }

    /// The parsed vault location.
    pub fn location(&self) -> &VaultLocation {
        &self.location
    }

    /// Fetch the secret.
    ///
    /// Without a `credential`, one is resolved from this provider's own
    /// parameters. A non-JSON secret is returned as a literal. A JSON secret
    /// is indexed by the `key` parameter when one is given.
    #[instrument(skip(self, credential), fields(vault = %self.location.host, secret = %self.location.name))]
    pub async fn fetch_secret(&self, credential: Option<&AzureCredential>) -> Result<RawValue> {
        let owned;
        let credential = match credential {
            Some(credential) => credential,
            None => {
                owned = resolve_azure_credential(&self.params)?;
                &owned
            }
        };

        let secret = get_secret(self.factory.as_ref(), credential, &self.location)
            .await
            .map_err(|e| ConfigError::PrimaryFetch(e.to_string()))?;

        match RawValue::classify(&secret) {
            RawValue::Parsed(document) => {
                let selected = select_alias(document, self.params.get_non_empty("key"))?;
                Ok(RawValue::Parsed(selected))
            }
            literal => Ok(literal),
        }
    }
}

#[async_trait]
impl ConfigProvider for AzureVaultProvider {
    async fn return_config(&self) -> Result<ConfigObject> {
        let document = match self.fetch_secret(None).await? {
            RawValue::Parsed(document) => document,
            RawValue::Literal(_) => {
                return Err(ConfigError::DeserializationError(format!(
                    "secret '{}' does not hold a JSON configuration",
                    self.location.name
                )));
            }
        };

        debug!(alias = ?alias(&self.params), "Assembling configuration from vault secret");
        let resolver = SecretResolver::new(&self.params, &self.factories);
        assemble(&document, &resolver).await
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::AzureVault
    }

    fn name(&self) -> String {
        format!("azurevault:{}", self.location.url())
    }
}

async fn get_secret(
    factory: &dyn AzureClientFactory,
    credential: &AzureCredential,
    location: &VaultLocation,
) -> std::result::Result<String, ClientError> {
    let client = factory.key_vault_client(&location.host, credential)?;
    client
        .get_secret(&location.name, location.version.as_deref())
        .await
}

/// Fetch a vault secret referenced from inside a configuration.
pub(crate) async fn fetch_vault_secret(
    factory: &dyn AzureClientFactory,
    credential: &AzureCredential,
    location: &VaultLocation,
) -> Result<String> {
    get_secret(factory, credential, location).await.map_err(|e| {
        ConfigError::SecretResolution(format!("{}: {}", location.url(), e))
    })
}


//! Azure App Configuration provider.

use super::ConfigProvider;
use super::azure_vault::fetch_vault_secret;
use super::document::DRIVER_SECTION;
use crate::auth::{AzureCredential, resolve_azure_credential};
use crate::client::{AppConfigClient, AzureClientFactory, ClientFactories};
use crate::core::{
    ConfigObject, DriverOptions, ParamStore, ProviderKind, RawValue, parse_ttl, parse_vault_uri,
    validate_wallet,
};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Reads connection settings from an Azure App Configuration store.
///
/// Settings are looked up as `<key><name>` under the optional `label`
/// parameter:
///
/// | name                  | required | notes                                   |
/// |-----------------------|----------|-----------------------------------------|
/// | `connect_descriptor`  | yes      |                                         |
/// | `node-oracledb`       | no       | JSON object of driver options           |
/// | `user`                | no       |                                         |
/// | `password`            | no       | may be `{"uri": "<key vault secret>"}`  |
/// | `wallet_location`     | no       | may be a vault reference; must be PEM   |
/// | `config_time_to_live` | no       | seconds                                 |
///
/// Vault references are fetched with the same credential used for the store.
///
/// # Examples
///
/// ```rust,no_run
/// use cloud_config_resolver::client::{AzureClientFactory, ClientFactories};
/// use cloud_config_resolver::sources::{AzureConfigProvider, ConfigProvider};
/// use std::sync::Arc;
///
/// # async fn example(factory: Arc<dyn AzureClientFactory>) -> cloud_config_resolver::error::Result<()> {
/// let factories = ClientFactories::new().with_azure(factory);
/// let provider = AzureConfigProvider::new(
///     "myappconfig.azconfig.io",
///     "key=sales/&label=prod&azure_client_secret=...",
///     &factories,
/// )?;
/// let config = provider.return_config().await?;
/// # Ok(())
/// # }
/// ```
pub struct AzureConfigProvider {
    params: ParamStore,
    factory: Arc<dyn AzureClientFactory>,
}

impl AzureConfigProvider {
    /// Create a provider for the store `appconfigname`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProviderNotRegistered`] if no Azure factory is registered.
    pub fn new(appconfigname: &str, extended: &str, factories: &ClientFactories) -> Result<Self> {
        let mut params = ParamStore::parse(extended);
        params.set("appconfigname", appconfigname);

        Ok(Self {
            params,
            factory: factories.require_azure(ProviderKind::Azure.as_str())?,
        })
    }

    /// The provider's parameters.
    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    /// Fetch the configuration and also return the credential that was used.
    #[instrument(skip(self), fields(store = self.params.get("appconfigname").unwrap_or_default()))]
    pub async fn load(&self) -> Result<(ConfigObject, AzureCredential)> {
        let credential = resolve_azure_credential(&self.params)?;
        let store = self.params.get_non_empty("appconfigname").ok_or_else(|| {
            ConfigError::InvalidReference("missing Azure App Configuration name".to_string())
        })?;

        let client = self
            .factory
            .app_config_client(&format!("https://{}", store), &credential)
            .map_err(|e| ConfigError::PrimaryFetch(e.to_string()))?;
        let client = client.as_ref();
        let label = self.params.get_non_empty("label");

        let mut config = ConfigObject::new();

        config.connect_string = Some(
            client
                .get_setting(&self.setting_key("connect_descriptor"), label)
                .await
                .map_err(|e| ConfigError::PrimaryFetch(e.to_string()))?,
        );

        let options = self
            .fetch_optional(client, DRIVER_SECTION, label)
            .await
            .and_then(|raw| {
                serde_json::from_str(&raw)
                    .and_then(DriverOptions::from_section)
                    .map_err(|e| ConfigError::OptionalFetch(format!("{}: {}", DRIVER_SECTION, e)))
            });
        match options {
            Ok(options) => config.options = options,
            Err(err) => debug!(error = %err, "Driver options unavailable"),
        }

        match self.fetch_optional(client, "user", label).await {
            Ok(user) => config.user = Some(user),
            Err(err) => debug!(error = %err, "User unavailable"),
        }

        match self.fetch_optional(client, "config_time_to_live", label).await {
            Ok(ttl) => config.config_ttl = parse_ttl(&serde_json::Value::String(ttl)),
            Err(err) => debug!(error = %err, "Config time to live unavailable"),
        }

        config.password = self.resolve_secret(client, &credential, "password", label).await?;
        config.wallet_content = self
            .resolve_secret(client, &credential, "wallet_location", label)
            .await?;

        if let Some(wallet) = config.wallet_content.as_deref().filter(|w| !w.is_empty()) {
            validate_wallet(wallet)?;
        }

        info!("Resolved configuration from Azure App Configuration");
        Ok((config, credential))
    }

    fn setting_key(&self, name: &str) -> String {
        format!("{}{}", self.params.get("key").unwrap_or_default(), name)
    }

    async fn fetch_optional(
        &self,
        client: &dyn AppConfigClient,
        name: &str,
        label: Option<&str>,
    ) -> Result<String> {
        client
            .get_setting(&self.setting_key(name), label)
            .await
            .map_err(|e| {
                if !e.is_not_found() {
                    warn!(setting = name, error = %e, "Optional setting lookup failed");
                }
                ConfigError::OptionalFetch(format!("{}: {}", name, e))
            })
    }

    /// Fetch a secret-bearing setting, following one Key Vault hop if the
    /// value is `{"uri": ...}`.
    async fn resolve_secret(
        &self,
        client: &dyn AppConfigClient,
        credential: &AzureCredential,
        name: &str,
        label: Option<&str>,
    ) -> Result<Option<String>> {
        let raw = match self.fetch_optional(client, name, label).await {
            Ok(raw) if !raw.is_empty() => raw,
            Ok(_) => return Ok(None),
            Err(err) => {
                debug!(error = %err, "Secret setting unavailable");
                return Ok(None);
            }
        };

        let classified = RawValue::classify(&raw);
        let Some(location) = classified.vault_uri().and_then(parse_vault_uri) else {
            return Ok(Some(raw));
        };

        debug!(setting = name, vault = %location.host, "Following Key Vault reference");
        fetch_vault_secret(self.factory.as_ref(), credential, &location)
            .await
            .map(Some)
    }
}

#[async_trait]
impl ConfigProvider for AzureConfigProvider {
    async fn return_config(&self) -> Result<ConfigObject> {
        self.load().await.map(|(config, _)| config)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Azure
    }

    fn name(&self) -> String {
        format!(
            "azure:{}",
            self.params.get("appconfigname").unwrap_or_default()
        )
    }
}

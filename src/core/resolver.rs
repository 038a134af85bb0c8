//! Provider dispatch for configuration references.

use super::builder::ConfigResolverBuilder;
use super::{ConfigObject, ProviderKind, ProviderReference, merge};
use crate::client::ClientFactories;
use crate::error::Result;
use crate::sources::{ConfigProvider, FileConfigProvider};
use tracing::{debug, instrument};

#[cfg(not(all(feature = "azure", feature = "oci")))]
use crate::error::ConfigError;

/// Entry point resolving a provider reference into a [`ConfigObject`].
///
/// A resolver holds only the registered client factories; every resolution
/// builds its own provider, parameters and credential, so one resolver can
/// serve concurrent connection attempts.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    factories: ClientFactories,
}

impl ConfigResolver {
    pub(crate) fn new(factories: ClientFactories) -> Self {
        Self { factories }
    }

    /// Create a new builder for constructing a resolver.
    pub fn builder() -> ConfigResolverBuilder {
        ConfigResolverBuilder::new()
    }

    /// The registered client factories.
    pub fn factories(&self) -> &ClientFactories {
        &self.factories
    }

    /// Build the provider for `kind` at `location`.
    ///
    /// # Errors
    ///
    /// - [`FeatureNotEnabled`](crate::error::ConfigError::FeatureNotEnabled) if the kind's ecosystem is compiled out
    /// - [`ProviderNotRegistered`](crate::error::ConfigError::ProviderNotRegistered) if its client factory is missing
    /// - [`InvalidReference`](crate::error::ConfigError::InvalidReference) if the location is malformed
    pub fn provider(
        &self,
        kind: ProviderKind,
        location: &str,
        extended: &str,
    ) -> Result<Box<dyn ConfigProvider>> {
        match kind {
            ProviderKind::File => Ok(Box::new(FileConfigProvider::new(
                location,
                extended,
                &self.factories,
            ))),
            #[cfg(feature = "azure")]
            ProviderKind::Azure => Ok(Box::new(crate::sources::AzureConfigProvider::new(
                location,
                extended,
                &self.factories,
            )?)),
            #[cfg(feature = "azure")]
            ProviderKind::AzureVault => Ok(Box::new(crate::sources::AzureVaultProvider::new(
                location,
                extended,
                &self.factories,
            )?)),
            #[cfg(feature = "oci")]
            ProviderKind::OciObject => Ok(Box::new(crate::sources::OciConfigProvider::new(
                location,
                extended,
                &self.factories,
            )?)),
            #[cfg(feature = "oci")]
            ProviderKind::OciVault => Ok(Box::new(crate::sources::OciVaultProvider::new(
                location,
                extended,
                &self.factories,
            )?)),
            #[cfg(not(feature = "azure"))]
            ProviderKind::Azure | ProviderKind::AzureVault => {
                Err(ConfigError::FeatureNotEnabled("azure"))
            }
            #[cfg(not(feature = "oci"))]
            ProviderKind::OciObject | ProviderKind::OciVault => {
                Err(ConfigError::FeatureNotEnabled("oci"))
            }
        }
    }

    /// Fetch the configuration for `kind` at `location`.
    ///
    /// Fatal failures abort the whole resolution; no partial configuration is
    /// returned. Optional entries that cannot be fetched are left empty.
    #[instrument(skip(self, kind, extended), fields(kind = %kind))]
    pub async fn resolve_config(
        &self,
        kind: ProviderKind,
        location: &str,
        extended: &str,
    ) -> Result<ConfigObject> {
        let provider = self.provider(kind, location, extended)?;
        debug!(provider = %provider.name(), "Resolving configuration");
        provider.return_config().await
    }

    /// Parse a `config-<kind>://<location>[?<extended>]` reference and resolve it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidReference`](crate::error::ConfigError::InvalidReference) for a malformed reference, and
    /// otherwise whatever [`resolve_config`](Self::resolve_config) returns.
    pub async fn resolve(&self, reference: &str) -> Result<ConfigObject> {
        let reference: ProviderReference = reference.parse()?;
        self.resolve_config(reference.kind, &reference.location, &reference.extended)
            .await
    }

    /// Resolve `reference` and merge the result into `user`.
    pub async fn resolve_and_merge(&self, reference: &str, user: &ConfigObject) -> Result<ConfigObject> {
        let cloud = self.resolve(reference).await?;
        Ok(merge(&cloud, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_resolve_file_reference() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        fs::write(&path, r#"{"connect_descriptor": "db/svc", "user": "app"}"#).unwrap();

        let resolver = ConfigResolver::builder().build();
        let config = resolver
            .resolve(&format!("config-file://{}", path.display()))
            .await
            .unwrap();

        assert_eq!(config.connect_string.as_deref(), Some("db/svc"));
        assert_eq!(config.user.as_deref(), Some("app"));
    }

    #[tokio::test]
    async fn test_resolve_and_merge_user_wins_identity() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        fs::write(&path, r#"{"connect_descriptor": "db/svc", "user": "cloud"}"#).unwrap();

        let user = ConfigObject::new().with_user("local");
        let resolver = ConfigResolver::builder().build();
        let merged = resolver
            .resolve_and_merge(&format!("config-file://{}", path.display()), &user)
            .await
            .unwrap();

        assert_eq!(merged.user.as_deref(), Some("local"));
        assert_eq!(merged.connect_string.as_deref(), Some("db/svc"));
    }

    #[tokio::test]
    async fn test_resolve_invalid_reference() {
        let resolver = ConfigResolver::builder().build();
        assert!(matches!(
            resolver.resolve("tcp://db:1521/svc").await,
            Err(ConfigError::InvalidReference(_))
        ));
    }

    #[cfg(feature = "azure")]
    #[test]
    fn test_unregistered_factory() {
        let resolver = ConfigResolver::builder().build();
        assert!(matches!(
            resolver.provider(ProviderKind::Azure, "store.azconfig.io", ""),
            Err(ConfigError::ProviderNotRegistered(_))
        ));
    }

    #[cfg(not(feature = "oci"))]
    #[test]
    fn test_disabled_feature() {
        let resolver = ConfigResolver::builder().build();
        assert!(matches!(
            resolver.provider(ProviderKind::OciObject, "host/n/ns/b/b/o/f", ""),
            Err(ConfigError::FeatureNotEnabled("oci"))
        ));
    }
}

//! Builder for constructing ConfigResolver instances.

use crate::client::ClientFactories;
use crate::core::ConfigResolver;

#[cfg(feature = "azure")]
use crate::client::AzureClientFactory;
#[cfg(feature = "oci")]
use crate::client::OciClientFactory;
#[cfg(any(feature = "azure", feature = "oci"))]
use std::sync::Arc;

/// Builder for constructing a `ConfigResolver`.
///
/// Registers one client factory per cloud ecosystem. Provider kinds whose
/// factory is not registered fail with
/// [`ConfigError::ProviderNotRegistered`](crate::error::ConfigError::ProviderNotRegistered)
/// when resolved; local files need no factory.
///
/// # Examples
///
/// ```rust,no_run
/// use cloud_config_resolver::client::AzureClientFactory;
/// use cloud_config_resolver::prelude::*;
///
/// # async fn example(factory: impl AzureClientFactory + 'static) -> Result<()> {
/// let resolver = ConfigResolver::builder().with_azure(factory).build();
///
/// let config = resolver
///     .resolve("config-azure://myappconfig.azconfig.io?key=sales/&label=prod")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigResolverBuilder {
    factories: ClientFactories,
}

impl ConfigResolverBuilder {
    /// Create a new builder with no factories registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the factory for Azure App Configuration and Key Vault clients.
    #[cfg(feature = "azure")]
    pub fn with_azure<F: AzureClientFactory + 'static>(mut self, factory: F) -> Self {
        self.factories = self.factories.with_azure(Arc::new(factory));
        self
    }

    /// Register the factory for OCI Object Storage and secrets clients.
    #[cfg(feature = "oci")]
    pub fn with_oci<F: OciClientFactory + 'static>(mut self, factory: F) -> Self {
        self.factories = self.factories.with_oci(Arc::new(factory));
        self
    }

    /// Register a prepared set of factories, replacing any registered so far.
    pub fn with_factories(mut self, factories: ClientFactories) -> Self {
        self.factories = factories;
        self
    }

    /// Build the resolver.
    pub fn build(self) -> ConfigResolver {
        ConfigResolver::new(self.factories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_without_factories() {
        let resolver = ConfigResolverBuilder::new().build();
        let debug = format!("{:?}", resolver);
        assert!(debug.contains("ClientFactories"));
    }

    #[cfg(feature = "oci")]
    #[test]
    fn test_builder_registers_oci() {
        use crate::auth::OciCredential;
        use crate::client::{ObjectStorageClient, SecretsClient};
        use crate::error::ClientError;

        struct Unreachable;
        impl OciClientFactory for Unreachable {
            fn object_storage_client(
                &self,
                _endpoint: &str,
                _credential: &OciCredential,
            ) -> Result<Box<dyn ObjectStorageClient>, ClientError> {
                Err(ClientError::new("unreachable"))
            }
            fn secrets_client(
                &self,
                _credential: &OciCredential,
            ) -> Result<Box<dyn SecretsClient>, ClientError> {
                Err(ClientError::new("unreachable"))
            }
        }

        let builder = ConfigResolverBuilder::new().with_oci(Unreachable);
        assert!(builder.factories.oci.is_some());
    }
}

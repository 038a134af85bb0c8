//! Capability interfaces for the cloud services a resolution talks to.
//!
//! The crate does not implement cloud transports. Callers register a client
//! factory per ecosystem with [`ConfigResolver`](crate::core::ConfigResolver);
//! each provider asks its factory for a client bound to the credential it
//! selected.

#[cfg(any(feature = "azure", feature = "oci"))]
use crate::error::ClientError;
#[cfg(any(feature = "azure", feature = "oci"))]
use async_trait::async_trait;
#[cfg(any(feature = "azure", feature = "oci"))]
use std::sync::Arc;

#[cfg(feature = "azure")]
use crate::auth::AzureCredential;
#[cfg(feature = "oci")]
use crate::auth::OciCredential;

/// Client for an Azure App Configuration store.
#[cfg(feature = "azure")]
#[async_trait]
pub trait AppConfigClient: Send + Sync {
    /// Fetch the value of `key` under `label` (`None` means no label).
    ///
    /// Fails with a 404 [`ClientError`] when the setting does not exist.
    async fn get_setting(&self, key: &str, label: Option<&str>) -> Result<String, ClientError>;
}

/// Client for an Azure Key Vault.
#[cfg(feature = "azure")]
#[async_trait]
pub trait KeyVaultClient: Send + Sync {
    /// Fetch the value of the secret `name` at `version` (`None` means the
    /// current version).
    async fn get_secret(&self, name: &str, version: Option<&str>) -> Result<String, ClientError>;
}

/// Creates Azure clients bound to a credential.
#[cfg(feature = "azure")]
pub trait AzureClientFactory: Send + Sync {
    /// Client for the App Configuration store at `endpoint` (`https://<name>`).
    fn app_config_client(
        &self,
        endpoint: &str,
        credential: &AzureCredential,
    ) -> Result<Box<dyn AppConfigClient>, ClientError>;

    /// Client for the Key Vault at `vault_url` (`https://<host>`).
    fn key_vault_client(
        &self,
        vault_url: &str,
        credential: &AzureCredential,
    ) -> Result<Box<dyn KeyVaultClient>, ClientError>;
}

/// Streaming body of an object storage object.
#[cfg(feature = "oci")]
pub type ObjectBody = Box<dyn tokio::io::AsyncRead + Send + Unpin>;

/// Client for OCI Object Storage.
#[cfg(feature = "oci")]
#[async_trait]
pub trait ObjectStorageClient: Send + Sync {
    /// Open the object `name` in `bucket` of `namespace`.
    async fn get_object(
        &self,
        namespace: &str,
        bucket: &str,
        name: &str,
    ) -> Result<ObjectBody, ClientError>;
}

/// Secret bundle returned by the OCI secrets service.
#[cfg(feature = "oci")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretBundle {
    /// Base64 encoded secret content
    pub content: String,
}

/// Client for the OCI secrets service.
#[cfg(feature = "oci")]
#[async_trait]
pub trait SecretsClient: Send + Sync {
    /// Fetch the current bundle of the secret `secret_id`.
    async fn get_secret_bundle(&self, secret_id: &str) -> Result<SecretBundle, ClientError>;
}

/// Creates OCI clients bound to a credential.
#[cfg(feature = "oci")]
pub trait OciClientFactory: Send + Sync {
    /// Client for the object storage endpoint (`https://<host>`).
    fn object_storage_client(
        &self,
        endpoint: &str,
        credential: &OciCredential,
    ) -> Result<Box<dyn ObjectStorageClient>, ClientError>;

    /// Client for the secrets service.
    fn secrets_client(&self, credential: &OciCredential) -> Result<Box<dyn SecretsClient>, ClientError>;
}

/// The client factories registered for a resolver.
#[derive(Clone, Default)]
pub struct ClientFactories {
    #[cfg(feature = "azure")]
    pub(crate) azure: Option<Arc<dyn AzureClientFactory>>,
    #[cfg(feature = "oci")]
    pub(crate) oci: Option<Arc<dyn OciClientFactory>>,
}

impl ClientFactories {
    /// No factories registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the Azure client factory.
    #[cfg(feature = "azure")]
    pub fn with_azure(mut self, factory: Arc<dyn AzureClientFactory>) -> Self {
        self.azure = Some(factory);
        self
    }

    /// Register the OCI client factory.
    #[cfg(feature = "oci")]
    pub fn with_oci(mut self, factory: Arc<dyn OciClientFactory>) -> Self {
        self.oci = Some(factory);
        self
    }

    #[cfg(feature = "azure")]
    pub(crate) fn require_azure(&self, kind: &str) -> crate::error::Result<Arc<dyn AzureClientFactory>> {
        self.azure
            .clone()
            .ok_or_else(|| crate::error::ConfigError::ProviderNotRegistered(kind.to_string()))
    }

    #[cfg(feature = "oci")]
    pub(crate) fn require_oci(&self, kind: &str) -> crate::error::Result<Arc<dyn OciClientFactory>> {
        self.oci
            .clone()
            .ok_or_else(|| crate::error::ConfigError::ProviderNotRegistered(kind.to_string()))
    }
}

impl std::fmt::Debug for ClientFactories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("ClientFactories");
        #[cfg(feature = "azure")]
        debug.field("azure", &self.azure.is_some());
        #[cfg(feature = "oci")]
        debug.field("oci", &self.oci.is_some());
        debug.finish()
    }
}

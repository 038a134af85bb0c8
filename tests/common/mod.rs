//! In-memory client factories shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use cloud_config_resolver::error::ClientError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[cfg(feature = "azure")]
pub use azure_mock::MockAzure;
#[cfg(feature = "oci")]
pub use oci_mock::MockOci;

pub const PEM_WALLET: &str = "-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIU\n-----END CERTIFICATE-----\n";

#[cfg(feature = "azure")]
mod azure_mock {
    use super::*;
    use cloud_config_resolver::auth::AzureCredential;
    use cloud_config_resolver::client::{AppConfigClient, AzureClientFactory, KeyVaultClient};

    #[derive(Default)]
    struct State {
        settings: HashMap<String, String>,
        secrets: HashMap<String, String>,
        endpoints: Vec<String>,
        vault_credentials: Vec<AzureCredential>,
        setting_lookups: Vec<(String, Option<String>)>,
    }

    /// Azure factory backed by maps of settings and vault secrets.
    #[derive(Clone, Default)]
    pub struct MockAzure {
        state: Arc<Mutex<State>>,
    }

    impl MockAzure {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_setting(self, key: &str, value: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .settings
                .insert(key.to_string(), value.to_string());
            self
        }

        /// Register a secret under `https://<host>/secrets/<name>[/<version>]`.
        pub fn with_secret(self, url: &str, value: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .secrets
                .insert(url.to_string(), value.to_string());
            self
        }

        pub fn endpoints(&self) -> Vec<String> {
            self.state.lock().unwrap().endpoints.clone()
        }

        pub fn vault_credentials(&self) -> Vec<AzureCredential> {
            self.state.lock().unwrap().vault_credentials.clone()
        }

        pub fn setting_lookups(&self) -> Vec<(String, Option<String>)> {
            self.state.lock().unwrap().setting_lookups.clone()
        }
    }

    struct MockAppConfig {
        state: Arc<Mutex<State>>,
    }

    #[async_trait]
    impl AppConfigClient for MockAppConfig {
        async fn get_setting(&self, key: &str, label: Option<&str>) -> Result<String, ClientError> {
            let mut state = self.state.lock().unwrap();
            state
                .setting_lookups
                .push((key.to_string(), label.map(str::to_string)));
            state
                .settings
                .get(key)
                .cloned()
                .ok_or_else(|| ClientError::not_found(format!("setting {} not found", key)))
        }
    }

    struct MockKeyVault {
        vault_url: String,
        state: Arc<Mutex<State>>,
    }

    #[async_trait]
    impl KeyVaultClient for MockKeyVault {
        async fn get_secret(
            &self,
            name: &str,
            version: Option<&str>,
        ) -> Result<String, ClientError> {
            let url = match version {
                Some(version) => format!("{}/secrets/{}/{}", self.vault_url, name, version),
                None => format!("{}/secrets/{}", self.vault_url, name),
            };
            self.state
                .lock()
                .unwrap()
                .secrets
                .get(&url)
                .cloned()
                .ok_or_else(|| ClientError::not_found(format!("secret {} not found", url)))
        }
    }

    impl AzureClientFactory for MockAzure {
        fn app_config_client(
            &self,
            endpoint: &str,
            _credential: &AzureCredential,
        ) -> Result<Box<dyn AppConfigClient>, ClientError> {
            self.state.lock().unwrap().endpoints.push(endpoint.to_string());
            Ok(Box::new(MockAppConfig {
                state: Arc::clone(&self.state),
            }))
        }

        fn key_vault_client(
            &self,
            vault_url: &str,
            credential: &AzureCredential,
        ) -> Result<Box<dyn KeyVaultClient>, ClientError> {
            self.state
                .lock()
                .unwrap()
                .vault_credentials
                .push(credential.clone());
            Ok(Box::new(MockKeyVault {
                vault_url: vault_url.to_string(),
                state: Arc::clone(&self.state),
            }))
        }
    }
}

#[cfg(feature = "oci")]
mod oci_mock {
    use super::*;
    use cloud_config_resolver::auth::OciCredential;
    use cloud_config_resolver::client::{
        ObjectBody, ObjectStorageClient, OciClientFactory, SecretBundle, SecretsClient,
    };

    #[derive(Default)]
    struct State {
        objects: HashMap<String, Vec<u8>>,
        bundles: HashMap<String, String>,
        endpoints: Vec<String>,
        credentials: Vec<OciCredential>,
        bundle_lookups: Vec<String>,
    }

    /// OCI factory backed by maps of objects and secret bundles.
    #[derive(Clone, Default)]
    pub struct MockOci {
        state: Arc<Mutex<State>>,
    }

    impl MockOci {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register an object under `<namespace>/<bucket>/<name>`.
        pub fn with_object(self, path: &str, content: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .objects
                .insert(path.to_string(), content.as_bytes().to_vec());
            self
        }

        /// Register a secret bundle with already base64 encoded content.
        pub fn with_bundle(self, secret_id: &str, content: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .bundles
                .insert(secret_id.to_string(), content.to_string());
            self
        }

        pub fn endpoints(&self) -> Vec<String> {
            self.state.lock().unwrap().endpoints.clone()
        }

        pub fn credentials(&self) -> Vec<OciCredential> {
            self.state.lock().unwrap().credentials.clone()
        }

        pub fn bundle_lookups(&self) -> Vec<String> {
            self.state.lock().unwrap().bundle_lookups.clone()
        }
    }

    struct MockObjectStorage {
        state: Arc<Mutex<State>>,
    }

    #[async_trait]
    impl ObjectStorageClient for MockObjectStorage {
        async fn get_object(
            &self,
            namespace: &str,
            bucket: &str,
            name: &str,
        ) -> Result<ObjectBody, ClientError> {
            let path = format!("{}/{}/{}", namespace, bucket, name);
            let bytes = self
                .state
                .lock()
                .unwrap()
                .objects
                .get(&path)
                .cloned()
                .ok_or_else(|| ClientError::not_found(format!("object {} not found", path)))?;
            Ok(Box::new(std::io::Cursor::new(bytes)))
        }
    }

    struct MockSecrets {
        state: Arc<Mutex<State>>,
    }

    #[async_trait]
    impl SecretsClient for MockSecrets {
        async fn get_secret_bundle(&self, secret_id: &str) -> Result<SecretBundle, ClientError> {
            let mut state = self.state.lock().unwrap();
            state.bundle_lookups.push(secret_id.to_string());
            state
                .bundles
                .get(secret_id)
                .cloned()
                .map(|content| SecretBundle { content })
                .ok_or_else(|| ClientError::not_found(format!("secret {} not found", secret_id)))
        }
    }

    impl OciClientFactory for MockOci {
        fn object_storage_client(
            &self,
            endpoint: &str,
            credential: &OciCredential,
        ) -> Result<Box<dyn ObjectStorageClient>, ClientError> {
            let mut state = self.state.lock().unwrap();
            state.endpoints.push(endpoint.to_string());
            state.credentials.push(credential.clone());
            Ok(Box::new(MockObjectStorage {
                state: Arc::clone(&self.state),
            }))
        }

        fn secrets_client(
            &self,
            credential: &OciCredential,
        ) -> Result<Box<dyn SecretsClient>, ClientError> {
            self.state.lock().unwrap().credentials.push(credential.clone());
            Ok(Box::new(MockSecrets {
                state: Arc::clone(&self.state),
            }))
        }
    }
}

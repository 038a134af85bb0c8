//! Local file configuration provider.

use super::ConfigProvider;
use super::document::{alias, assemble, parse_document, select_alias};
use super::secret_resolver::SecretResolver;
use crate::client::ClientFactories;
use crate::core::{ConfigObject, ParamStore, ProviderKind};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::instrument;

/// Reads a JSON configuration document from a local file.
///
/// Vault references inside the document resolve through the registered
/// factories; an OCI credential is built from the same parameters only when
/// an OCI vault reference is met.
///
/// # Examples
///
/// ```rust,no_run
/// use cloud_config_resolver::client::ClientFactories;
/// use cloud_config_resolver::sources::{ConfigProvider, FileConfigProvider};
///
/// # async fn example() -> cloud_config_resolver::error::Result<()> {
/// let provider = FileConfigProvider::new("config/db.json", "key=prod", &ClientFactories::new());
/// let config = provider.return_config().await?;
/// # Ok(())
/// # }
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    params: ParamStore,
    factories: ClientFactories,
}

impl FileConfigProvider {
    /// Create a provider for the file at `path`.
    pub fn new(path: impl Into<PathBuf>, extended: &str, factories: &ClientFactories) -> Self {
        Self {
            path: path.into(),
            params: ParamStore::parse(extended),
            factories: factories.clone(),
        }
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<ConfigObject> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ConfigError::PrimaryFetch(format!("{}: {}", self.path.display(), e))
        })?;

        let document = select_alias(parse_document(&text)?, alias(&self.params))?;
        let resolver = SecretResolver::new(&self.params, &self.factories);
        assemble(&document, &resolver).await
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn return_config(&self) -> Result<ConfigObject> {
        self.load().await
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::File
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_provider_with_alias() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        fs::write(
            &path,
            r#"{
                "prod": {"connect_descriptor": "prod-db/svc", "user": "app"},
                "test": {"connect_descriptor": "test-db/svc", "user": "tester"}
            }"#,
        )
        .unwrap();

        let provider = FileConfigProvider::new(&path, "KEY=test", &ClientFactories::new());
        let config = provider.return_config().await.unwrap();

        assert_eq!(config.connect_string.as_deref(), Some("test-db/svc"));
        assert_eq!(config.user.as_deref(), Some("tester"));
    }

    #[tokio::test]
    async fn test_file_provider_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let provider = FileConfigProvider::new(
            temp_dir.path().join("missing.json"),
            "",
            &ClientFactories::new(),
        );

        assert!(matches!(
            provider.return_config().await,
            Err(ConfigError::PrimaryFetch(_))
        ));
    }

    #[tokio::test]
    async fn test_file_provider_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        fs::write(&path, "connect_descriptor = nope").unwrap();

        let provider = FileConfigProvider::new(&path, "", &ClientFactories::new());
        assert!(matches!(
            provider.return_config().await,
            Err(ConfigError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_name() {
        let provider = FileConfigProvider::new("/etc/db.json", "", &ClientFactories::new());
        assert_eq!(provider.name(), "file:/etc/db.json");
        assert_eq!(provider.kind(), ProviderKind::File);
    }
}

//! OCI Object Storage provider.

use super::ConfigProvider;
use super::document::{alias, assemble, parse_document, select_alias};
use super::secret_resolver::SecretResolver;
use crate::auth::resolve_oci_credential;
use crate::client::{ClientFactories, OciClientFactory};
use crate::core::{ConfigObject, ParamStore, ProviderKind};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, instrument, warn};

static OBJECT_LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<objservername>[A-Za-z0-9._-]+)/n/(?P<namespace>[^/]+)/b/(?P<bucketname>[^/]+)/o/(?P<filename>.+?)(?:/c/(?P<alias>[^/]+))?$",
    )
    .expect("hardcoded object location pattern is valid")
});

const LOCATION_GROUPS: [&str; 5] = ["objservername", "namespace", "bucketname", "filename", "alias"];

/// Split `<server>/n/<namespace>/b/<bucket>/o/<filename>[/c/<alias>]` into
/// its named parts.
///
/// Returns `None` when the location does not follow that layout.
///
/// # Examples
///
/// ```rust
/// use cloud_config_resolver::sources::parse_location;
///
/// let parts = parse_location(
///     "objectstorage.us-phoenix-1.oraclecloud.com/n/ns1/b/bkt1/o/cfg.json/c/prod",
/// )
/// .unwrap();
/// assert!(parts.contains(&("namespace", "ns1".to_string())));
/// assert!(parts.contains(&("alias", "prod".to_string())));
/// ```
pub fn parse_location(location: &str) -> Option<Vec<(&'static str, String)>> {
    let captures = OBJECT_LOCATION_PATTERN.captures(location.trim())?;
    Some(
        LOCATION_GROUPS
            .iter()
            .filter_map(|group| {
                captures
                    .name(group)
                    .map(|m| (*group, m.as_str().to_string()))
            })
            .collect(),
    )
}

/// Reads a JSON configuration object from OCI Object Storage.
pub struct OciConfigProvider {
    params: ParamStore,
    factories: ClientFactories,
    factory: Arc<dyn OciClientFactory>,
}

impl OciConfigProvider {
    /// Create a provider for the object at `location`.
    ///
    /// The parts of the location are stored as `objservername`, `namespace`,
    /// `bucketname`, `filename` and `alias` parameters. A location that does
    /// not match leaves the explicitly supplied parameters in charge.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ProviderNotRegistered`] if no OCI factory is registered.
    pub fn new(location: &str, extended: &str, factories: &ClientFactories) -> Result<Self> {
        let mut params = ParamStore::parse(extended);
        match parse_location(location) {
            Some(parts) => {
                for (name, value) in parts {
                    params.set(name, value);
                }
            }
            None => warn!(location, "Object storage location does not match the expected layout"),
        }

        Ok(Self {
            params,
            factory: factories.require_oci(ProviderKind::OciObject.as_str())?,
            factories: factories.clone(),
        })
    }

    /// The provider's parameters.
    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    fn required(&self, name: &str) -> Result<&str> {
        self.params.get_non_empty(name).ok_or_else(|| {
            ConfigError::InvalidReference(format!("object storage location is missing '{}'", name))
        })
    }

    #[instrument(skip(self), fields(object = self.params.get("filename").unwrap_or_default()))]
    async fn load(&self) -> Result<ConfigObject> {
        let credential = resolve_oci_credential(&self.params).await?;

        let server = self.required("objservername")?;
        let namespace = self.required("namespace")?;
        let bucket = self.required("bucketname")?;
        let filename = self.required("filename")?;

        let client = self
            .factory
            .object_storage_client(&format!("https://{}", server), &credential)
            .map_err(|e| ConfigError::PrimaryFetch(e.to_string()))?;
        let mut body = client
            .get_object(namespace, bucket, filename)
            .await
            .map_err(|e| ConfigError::PrimaryFetch(e.to_string()))?;

        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes)
            .await
            .map_err(|e| ConfigError::PrimaryFetch(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| {
            ConfigError::DeserializationError(format!("object is not valid UTF-8: {}", e))
        })?;
        debug!(bytes = text.len(), "Fetched configuration object");

        let document = select_alias(parse_document(&text)?, alias(&self.params))?;
        let resolver =
            SecretResolver::new(&self.params, &self.factories).with_oci_credential(credential);
        let config = assemble(&document, &resolver).await?;

        info!("Resolved configuration from OCI Object Storage");
        Ok(config)
    }
}

#[async_trait]
impl ConfigProvider for OciConfigProvider {
    async fn return_config(&self) -> Result<ConfigObject> {
        self.load().await
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OciObject
    }

    fn name(&self) -> String {
        format!(
            "ociobject:{}/{}",
            self.params.get("bucketname").unwrap_or_default(),
            self.params.get("filename").unwrap_or_default()
        )
    }
}

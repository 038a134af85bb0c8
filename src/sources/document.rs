//! Assembly of a [`ConfigObject`] from a JSON configuration document.
//!
//! Used by every provider whose payload is a single JSON document (object
//! storage, vault secrets, local files).

use super::secret_resolver::SecretResolver;
use crate::core::{ConfigObject, DriverOptions, ParamStore, parse_ttl, validate_wallet};
use crate::error::{ConfigError, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Name of the section holding driver tuning options.
pub(crate) const DRIVER_SECTION: &str = "node-oracledb";

/// The alias selecting one entry of a multi-entry document.
///
/// An explicit `key` parameter wins over an `alias` taken from the location.
pub(crate) fn alias(params: &ParamStore) -> Option<&str> {
    params
        .get_non_empty("key")
        .or_else(|| params.get_non_empty("alias"))
}

/// Index into `document` by `alias`, when one is given.
pub(crate) fn select_alias(document: Value, alias: Option<&str>) -> Result<Value> {
    let Some(alias) = alias else {
        return Ok(document);
    };

    match document {
        Value::Object(mut entries) => entries.remove(alias).ok_or_else(|| {
            ConfigError::PrimaryFetch(format!("alias '{}' not found in configuration", alias))
        }),
        _ => Err(ConfigError::DeserializationError(format!(
            "cannot select alias '{}' from a non-object configuration",
            alias
        ))),
    }
}

/// Parse a JSON configuration payload.
pub(crate) fn parse_document(text: &str) -> Result<Value> {
    serde_json::from_str(text)
        .map_err(|e| ConfigError::DeserializationError(format!("invalid JSON configuration: {}", e)))
}

/// Build a configuration from a (possibly alias-selected) document.
pub(crate) async fn assemble(document: &Value, resolver: &SecretResolver<'_>) -> Result<ConfigObject> {
    let entries = document.as_object().ok_or_else(|| {
        ConfigError::DeserializationError("configuration document must be a JSON object".to_string())
    })?;
    let mut config = ConfigObject::new();

    if let Some(section) = entries.get(DRIVER_SECTION).filter(|s| !s.is_null()) {
        match DriverOptions::from_section(section.clone()) {
            Ok(options) => config.options = options,
            Err(e) => warn!(error = %e, "Ignoring malformed {} section", DRIVER_SECTION),
        }
    }

    config.connect_string = entries
        .get("connect_descriptor")
        .and_then(Value::as_str)
        .map(str::to_string);
    config.user = entries.get("user").and_then(Value::as_str).map(str::to_string);
    config.config_ttl = entries.get("config_time_to_live").and_then(parse_ttl);

    if let Some(password) = entries.get("password") {
        config.password = resolver.resolve("password", password).await?;
    }

    if let Some(wallet) = entries.get("wallet_location") {
        config.wallet_content = resolver.resolve("wallet_location", wallet).await?;
        if let Some(content) = config.wallet_content.as_deref().filter(|c| !c.is_empty()) {
            validate_wallet(content)?;
        }
    }

    debug!(
        has_user = config.user.is_some(),
        has_password = config.password.is_some(),
        has_wallet = config.wallet_content.is_some(),
        "Assembled configuration document"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientFactories;
    use serde_json::json;

    #[test]
    fn test_alias_prefers_key() {
        let mut params = ParamStore::parse("key=prod");
        params.set("alias", "test");
        assert_eq!(alias(&params), Some("prod"));

        let mut params = ParamStore::new();
        params.set("alias", "test");
        assert_eq!(alias(&params), Some("test"));
    }

    #[test]
    fn test_select_alias() {
        let document = json!({"prod": {"user": "p"}, "test": {"user": "t"}});
        let selected = select_alias(document, Some("test")).unwrap();
        assert_eq!(selected, json!({"user": "t"}));
    }

    #[test]
    fn test_select_missing_alias() {
        let document = json!({"prod": {}});
        assert!(matches!(
            select_alias(document, Some("dev")),
            Err(ConfigError::PrimaryFetch(_))
        ));
    }

    #[tokio::test]
    async fn test_assemble_literal_document() {
        let params = ParamStore::new();
        let factories = ClientFactories::new();
        let resolver = SecretResolver::new(&params, &factories);

        let document = json!({
            "connect_descriptor": "db.example.com/svc",
            "user": "scott",
            "password": "tiger",
            "config_time_to_live": 600,
            "node-oracledb": {"poolMin": 2, "poolMax": 5, "stmtCacheSize": 30}
        });

        let config = assemble(&document, &resolver).await.unwrap();
        assert_eq!(config.connect_string.as_deref(), Some("db.example.com/svc"));
        assert_eq!(config.user.as_deref(), Some("scott"));
        assert_eq!(config.password.as_deref(), Some("tiger"));
        assert_eq!(config.config_ttl, Some(600));
        assert_eq!(config.options.pool_max, Some(5));
        assert_eq!(config.options.stmt_cache_size, Some(30));
    }

    #[tokio::test]
    async fn test_assemble_rejects_non_pem_wallet() {
        let params = ParamStore::new();
        let factories = ClientFactories::new();
        let resolver = SecretResolver::new(&params, &factories);

        let document = json!({"connect_descriptor": "cs", "wallet_location": "not-pem-data"});
        assert!(matches!(
            assemble(&document, &resolver).await,
            Err(ConfigError::WalletFormat)
        ));
    }

    #[tokio::test]
    async fn test_assemble_ignores_malformed_driver_section() {
        let params = ParamStore::new();
        let factories = ClientFactories::new();
        let resolver = SecretResolver::new(&params, &factories);

        let document = json!({"connect_descriptor": "cs", "node-oracledb": [1, 2]});
        let config = assemble(&document, &resolver).await.unwrap();
        assert!(config.options.is_empty());
        assert_eq!(config.connect_string.as_deref(), Some("cs"));
    }

    #[tokio::test]
    async fn test_assemble_keeps_valid_options_beside_mistyped_ones() {
        let params = ParamStore::new();
        let factories = ClientFactories::new();
        let resolver = SecretResolver::new(&params, &factories);

        let document = json!({
            "connect_descriptor": "cs",
            "node-oracledb": {"poolMax": "many", "poolMin": 2, "stmtCacheSize": 30}
        });
        let config = assemble(&document, &resolver).await.unwrap();
        assert_eq!(config.options.pool_min, Some(2));
        assert_eq!(config.options.stmt_cache_size, Some(30));
        assert_eq!(config.options.pool_max, None);
        assert_eq!(config.options.extra.get("poolMax"), Some(&json!("many")));
    }
}

//! Normalized connection configuration.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Driver tuning options carried in the `node-oracledb` section of a
/// cloud configuration.
///
/// Recognized fields are typed; anything else is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverOptions {
    /// Minimum number of pooled connections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_min: Option<u32>,
    /// Maximum number of pooled connections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_max: Option<u32>,
    /// Connections opened when the pool grows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_increment: Option<u32>,
    /// Idle seconds before a pooled connection is closed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_timeout: Option<u32>,
    /// Seconds between liveness pings (negative disables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_ping_interval: Option<i64>,
    /// Milliseconds to wait for a ping reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_ping_timeout: Option<u32>,
    /// Statement cache size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stmt_cache_size: Option<u32>,
    /// Rows prefetched per round trip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefetch_rows: Option<u32>,
    /// LOB bytes prefetched per round trip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lob_prefetch_size: Option<u32>,
    /// Unrecognized pass-through options
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DriverOptions {
    /// Build options from a JSON object section.
    ///
    /// Each recognized field is converted on its own. A value that does not
    /// fit its typed field is kept in `extra` under its original key, so one
    /// mistyped option never discards the rest of the section.
    ///
    /// # Errors
    ///
    /// Fails only when `section` is not a JSON object.
    pub fn from_section(section: Value) -> serde_json::Result<Self> {
        let Value::Object(entries) = section else {
            return Err(serde_json::Error::custom("driver options must be a JSON object"));
        };

        let mut options = Self::default();
        for (key, value) in entries {
            let typed = match key.as_str() {
                "poolMin" => convert(&value, &mut options.pool_min),
                "poolMax" => convert(&value, &mut options.pool_max),
                "poolIncrement" => convert(&value, &mut options.pool_increment),
                "poolTimeout" => convert(&value, &mut options.pool_timeout),
                "poolPingInterval" => convert(&value, &mut options.pool_ping_interval),
                "poolPingTimeout" => convert(&value, &mut options.pool_ping_timeout),
                "stmtCacheSize" => convert(&value, &mut options.stmt_cache_size),
                "prefetchRows" => convert(&value, &mut options.prefetch_rows),
                "lobPrefetchSize" => convert(&value, &mut options.lob_prefetch_size),
                _ => false,
            };
            if !typed {
                options.extra.insert(key, value);
            }
        }
        Ok(options)
    }

    /// Whether no option is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite every option that `other` sets to a non-falsy value.
    ///
    /// Zero, `false`, the empty string and `null` leave the existing value in
    /// place.
    pub fn override_with(&mut self, other: &DriverOptions) {
        fn take<T: Clone + Default + PartialEq>(target: &mut Option<T>, source: &Option<T>) {
            if let Some(value) = source.as_ref().filter(|value| **value != T::default()) {
                *target = Some(value.clone());
            }
        }

        take(&mut self.pool_min, &other.pool_min);
        take(&mut self.pool_max, &other.pool_max);
        take(&mut self.pool_increment, &other.pool_increment);
        take(&mut self.pool_timeout, &other.pool_timeout);
        take(&mut self.pool_ping_interval, &other.pool_ping_interval);
        take(&mut self.pool_ping_timeout, &other.pool_ping_timeout);
        take(&mut self.stmt_cache_size, &other.stmt_cache_size);
        take(&mut self.prefetch_rows, &other.prefetch_rows);
        take(&mut self.lob_prefetch_size, &other.lob_prefetch_size);

        for (key, value) in &other.extra {
            if !is_falsy(value) {
                self.extra.insert(key.clone(), value.clone());
            }
        }
    }
}

fn convert<T: DeserializeOwned>(value: &Value, slot: &mut Option<T>) -> bool {
    match T::deserialize(value) {
        Ok(converted) => {
            *slot = Some(converted);
            true
        }
        Err(_) => false,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Connection configuration produced by a cloud provider or supplied by a caller.
///
/// Providers populate it field by field and return it once; it is then merged
/// with the caller's configuration via [`merge`](crate::core::merge).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigObject {
    /// Database connect descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_string: Option<String>,
    /// Alternate connect string field accepted from callers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    /// Database user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Database password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// PEM wallet content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_content: Option<String>,
    /// Seconds the cloud configuration may be cached by the caller
    #[serde(default, rename = "configTTL", skip_serializing_if = "Option::is_none")]
    pub config_ttl: Option<u64>,
    /// Driver tuning options
    #[serde(flatten)]
    pub options: DriverOptions,
}

impl ConfigObject {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect string.
    pub fn with_connect_string(mut self, connect_string: impl Into<String>) -> Self {
        self.connect_string = Some(connect_string.into());
        self
    }

    /// Set the user.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// Parse a `config_time_to_live` value given as a number or numeric string.
pub(crate) fn parse_ttl(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

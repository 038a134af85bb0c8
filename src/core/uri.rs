//! Vault secret URL parsing.

use regex::Regex;
use std::sync::LazyLock;

static VAULT_SECRET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https://)?(?P<host>[^/\s]+)/secrets/(?P<name>[^/\s?#]+)(?:/(?P<version>[^/\s?#]+))?/?$",
    )
    .expect("hardcoded vault secret pattern is valid")
});

/// Host and secret name extracted from a vault secret URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultLocation {
    /// Vault endpoint including scheme, e.g. `https://kv1.vault.azure.net`
    pub host: String,
    /// Secret name
    pub name: String,
    /// Pinned secret version; `None` means the current version
    pub version: Option<String>,
}

impl VaultLocation {
    /// The secret URL this location was parsed from, in canonical form.
    pub fn url(&self) -> String {
        match &self.version {
            Some(version) => format!("{}/secrets/{}/{}", self.host, self.name, version),
            None => format!("{}/secrets/{}", self.host, self.name),
        }
    }
}

/// Parse `https://<host>/secrets/<name>[/<version>]` into its parts.
///
/// The scheme may be omitted. Returns `None` when the value is not a vault
/// secret URL; callers treat that as "not a vault reference".
///
/// # Examples
///
/// ```rust
/// use cloud_config_resolver::core::parse_vault_uri;
///
/// let location = parse_vault_uri("https://kv1.vault.azure.net/secrets/mypwd").unwrap();
/// assert_eq!(location.host, "https://kv1.vault.azure.net");
/// assert_eq!(location.name, "mypwd");
///
/// assert!(parse_vault_uri("not-a-uri").is_none());
/// ```
pub fn parse_vault_uri(uri: &str) -> Option<VaultLocation> {
    let captures = VAULT_SECRET_PATTERN.captures(uri.trim())?;
    Some(VaultLocation {
        host: format!("https://{}", &captures["host"]),
        name: captures["name"].to_string(),
        version: captures.name("version").map(|m| m.as_str().to_string()),
    })
}

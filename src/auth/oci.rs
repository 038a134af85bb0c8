//! OCI credential selection and profile file loading.

use crate::core::ParamStore;
use crate::error::{ConfigError, Result};
use config::{Config, File, FileFormat};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const OCI_DEFAULT: &str = "OCI_DEFAULT";
const OCI_INSTANCE_PRINCIPAL: &str = "OCI_INSTANCE_PRINCIPAL";
const OCI_RESOURCE_PRINCIPAL: &str = "OCI_RESOURCE_PRINCIPAL";
const DEFAULT_PROFILE: &str = "DEFAULT";

/// A profile section of an OCI configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OciProfile {
    /// User OCID
    pub user: String,
    /// API key fingerprint
    pub fingerprint: String,
    /// Tenancy OCID
    pub tenancy: String,
    /// Region identifier, e.g. `us-phoenix-1`
    pub region: String,
    /// Path to the API signing key
    pub key_file: PathBuf,
    /// Passphrase of the signing key
    pub pass_phrase: Option<String>,
}

/// An OCI authentication strategy.
#[derive(Clone, PartialEq, Eq)]
pub enum OciCredential {
    /// Instance principal of the current compute instance
    InstancePrincipal,
    /// Resource principal of the current function or resource
    ResourcePrincipal,
    /// API key described by a profile file
    ConfigFile {
        /// Profile file the profile was read from
        path: PathBuf,
        /// Profile name
        profile_name: String,
        /// Parsed profile
        profile: OciProfile,
    },
    /// API key given inline through parameters
    ApiKey {
        /// Tenancy OCID
        tenancy: String,
        /// User OCID
        user: String,
        /// API key fingerprint
        fingerprint: Option<String>,
        /// PEM private key content
        private_key: String,
        /// Region in `US_PHOENIX_1` form
        region: String,
    },
}

impl fmt::Debug for OciCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstancePrincipal => f.write_str("InstancePrincipal"),
            Self::ResourcePrincipal => f.write_str("ResourcePrincipal"),
            Self::ConfigFile {
                path,
                profile_name,
                ..
            } => f
                .debug_struct("ConfigFile")
                .field("path", path)
                .field("profile_name", profile_name)
                .finish_non_exhaustive(),
            Self::ApiKey {
                tenancy,
                user,
                region,
                ..
            } => f
                .debug_struct("ApiKey")
                .field("tenancy", tenancy)
                .field("user", user)
                .field("region", region)
                .finish_non_exhaustive(),
        }
    }
}

/// Build the OCI credential selected by the `authentication` parameter.
///
/// `OCI_INSTANCE_PRINCIPAL` and `OCI_RESOURCE_PRINCIPAL` select platform
/// identities. Otherwise the profile file (`oci_profile_path`, `oci_profile`)
/// is tried first. If that fails and both `oci_tenancy` and `oci_user` were
/// given, an inline API key credential is built from `oci_fingerprint`,
/// `oci_key_file` and the region of the object storage host.
///
/// # Errors
///
/// - [`ConfigError::AuthSelection`] for an unknown `authentication` value
/// - the profile error when the profile fails and no inline key is given
/// - [`ConfigError::AuthBuild`] when the inline key cannot be built
pub async fn resolve_oci_credential(params: &ParamStore) -> Result<OciCredential> {
    let mode = params
        .get_non_empty("authentication")
        .map(str::to_uppercase);

    match mode.as_deref() {
        Some(OCI_INSTANCE_PRINCIPAL) => Ok(OciCredential::InstancePrincipal),
        Some(OCI_RESOURCE_PRINCIPAL) => Ok(OciCredential::ResourcePrincipal),
        None | Some(OCI_DEFAULT) => {
            let path = params.get_non_empty("oci_profile_path").map(Path::new);
            let profile_name = params.get_non_empty("oci_profile");

            match load_profile(path, profile_name) {
                Ok(credential) => Ok(credential),
                Err(err) => {
                    if !(params.contains("oci_tenancy") && params.contains("oci_user")) {
                        return Err(err);
                    }
                    warn!(error = %err, "OCI profile unavailable, using inline API key parameters");
                    inline_credential(params).await
                }
            }
        }
        Some(other) => Err(ConfigError::AuthSelection {
            provider: "OCI",
            value: other.to_string(),
        }),
    }
}

/// Derive the SDK region name from an object storage host.
///
/// The region is the label after `objectstorage` (which is the second
/// dot-delimited label of a regional endpoint), upper-cased with hyphens
/// turned into underscores.
///
/// # Examples
///
/// ```rust
/// use cloud_config_resolver::auth::retrieve_region;
///
/// assert_eq!(retrieve_region("objectstorage.us-phoenix-1.oraclecloud.com").unwrap(), "US_PHOENIX_1");
/// assert_eq!(
///     retrieve_region("x.compat.objectstorage.us-phoenix-1.oraclecloud.com").unwrap(),
///     "US_PHOENIX_1"
/// );
/// ```
pub fn retrieve_region(host: &str) -> Result<String> {
    let labels: Vec<&str> = host.split('.').collect();
    let index = labels
        .iter()
        .position(|label| label.eq_ignore_ascii_case("objectstorage"))
        .map_or(1, |position| position + 1);

    labels
        .get(index)
        .filter(|label| !label.is_empty())
        .map(|label| normalize_region(label))
        .ok_or_else(|| {
            ConfigError::AuthBuild(format!("cannot derive a region from host '{}'", host))
        })
}

/// Load a profile from an OCI configuration file.
///
/// `path` defaults to `~/.oci/config` and `profile_name` to `DEFAULT`.
/// Section and key names match case-insensitively.
///
/// # Errors
///
/// Returns [`ConfigError::Profile`] if the file is missing or unreadable, the
/// profile does not exist, or a required key is absent.
pub fn load_profile(path: Option<&Path>, profile_name: Option<&str>) -> Result<OciCredential> {
    let path = match path {
        Some(path) => expand_home(path),
        None => default_profile_path()?,
    };
    let profile_name = profile_name.unwrap_or(DEFAULT_PROFILE);

    if !path.is_file() {
        return Err(ConfigError::Profile(format!(
            "OCI config file not found: {}",
            path.display()
        )));
    }

    let path_str = path.to_str().ok_or_else(|| {
        ConfigError::Profile(format!("OCI config path is not valid UTF-8: {}", path.display()))
    })?;

    let settings = Config::builder()
        .add_source(File::new(path_str, FileFormat::Ini).required(true))
        .build()
        .map_err(|e| ConfigError::Profile(format!("Failed to load {}: {}", path.display(), e)))?;

    let sections = settings
        .try_deserialize::<HashMap<String, config::Value>>()
        .map_err(|e| ConfigError::Profile(format!("Failed to parse {}: {}", path.display(), e)))?;

    let section = sections
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(profile_name))
        .map(|(_, value)| value)
        .ok_or_else(|| {
            ConfigError::Profile(format!(
                "profile '{}' not found in {}",
                profile_name,
                path.display()
            ))
        })?
        .into_table()
        .map_err(|e| ConfigError::Profile(format!("profile '{}' is not a section: {}", profile_name, e)))?;

    let field = |key: &str| -> Option<String> {
        section
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .and_then(|(_, value)| value.clone().into_string().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };
    let required = |key: &str| {
        field(key).ok_or_else(|| {
            ConfigError::Profile(format!(
                "profile '{}' in {} is missing '{}'",
                profile_name,
                path.display(),
                key
            ))
        })
    };

    let profile = OciProfile {
        user: required("user")?,
        fingerprint: required("fingerprint")?,
        tenancy: required("tenancy")?,
        region: required("region")?,
        key_file: expand_home(Path::new(&required("key_file")?)),
        pass_phrase: field("pass_phrase"),
    };

    debug!(path = %path.display(), profile = profile_name, "Loaded OCI profile");

    Ok(OciCredential::ConfigFile {
        path,
        profile_name: profile_name.to_string(),
        profile,
    })
}

async fn inline_credential(params: &ParamStore) -> Result<OciCredential> {
    let key_file = params.get_non_empty("oci_key_file").ok_or_else(|| {
        ConfigError::AuthBuild("inline OCI authentication requires oci_key_file".to_string())
    })?;
    let private_key = tokio::fs::read_to_string(expand_home(Path::new(key_file)))
        .await
        .map_err(|e| ConfigError::AuthBuild(format!("cannot read oci_key_file {}: {}", key_file, e)))?;

    let region = match params.get_non_empty("objservername") {
        Some(host) => retrieve_region(host)?,
        None => params
            .get_non_empty("region")
            .map(normalize_region)
            .ok_or_else(|| {
                ConfigError::AuthBuild(
                    "inline OCI authentication requires an object storage host or a region parameter"
                        .to_string(),
                )
            })?,
    };

    Ok(OciCredential::ApiKey {
        tenancy: params.get_non_empty("oci_tenancy").unwrap_or_default().to_string(),
        user: params.get_non_empty("oci_user").unwrap_or_default().to_string(),
        fingerprint: params.get_non_empty("oci_fingerprint").map(str::to_string),
        private_key,
        region,
    })
}

fn normalize_region(region: &str) -> String {
    region.to_uppercase().replace('-', "_")
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

fn default_profile_path() -> Result<PathBuf> {
    home_dir()
        .map(|home| home.join(".oci").join("config"))
        .ok_or_else(|| ConfigError::Profile("cannot locate home directory for ~/.oci/config".to_string()))
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

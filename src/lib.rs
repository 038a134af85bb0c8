//! # cloud-config-resolver
//!
//! Resolve database connection settings and secrets from centrally managed
//! cloud configuration.
//!
//! ## Overview
//!
//! Instead of carrying a connect string, user and password inline, an
//! application points at a provider reference such as
//! `config-azure://myappconfig.azconfig.io?key=sales/`. `cloud-config-resolver`:
//! - Selects a credential from the reference's parameters
//! - Fetches the configuration from the provider
//! - Follows vault references for the password and wallet (one hop)
//! - Rejects wallets that are not PEM
//! - Merges the result with caller-supplied settings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloud_config_resolver::client::AzureClientFactory;
//! use cloud_config_resolver::prelude::*;
//!
//! # async fn example(factory: impl AzureClientFactory + 'static) -> Result<()> {
//! let resolver = ConfigResolver::builder().with_azure(factory).build();
//!
//! let user_config = ConfigObject::new().with_user("app_user");
//! let config = resolver
//!     .resolve_and_merge(
//!         "config-azure://myappconfig.azconfig.io?key=sales/&azure_client_secret=...",
//!         &user_config,
//!     )
//!     .await?;
//!
//! println!("Connecting to {:?}", config.connect_string);
//! # Ok(())
//! # }
//! ```
//!
//! ## Providers
//!
//! | reference kind     | source                                   |
//! |--------------------|------------------------------------------|
//! | `config-azure`     | Azure App Configuration store            |
//! | `config-azurevault`| single Azure Key Vault secret            |
//! | `config-ociobject` | OCI Object Storage JSON object           |
//! | `config-ocivault`  | OCI vault secret holding a JSON document |
//! | `config-file`      | local JSON file                          |
//!
//! Cloud SDK transports are not part of this crate: register an
//! [`AzureClientFactory`](client::AzureClientFactory) or
//! [`OciClientFactory`](client::OciClientFactory) backed by the SDK of your
//! choice.
//!
//! ## Feature Flags
//!
//! - `azure` (default): Azure App Configuration and Key Vault providers
//! - `oci` (default): OCI Object Storage and vault providers
//!
//! ```toml
//! [dependencies]
//! cloud-config-resolver = { version = "0.1", default-features = false, features = ["oci"] }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod core;
pub mod error;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::client::ClientFactories;
    pub use crate::core::{
        ConfigObject, ConfigResolver, ConfigResolverBuilder, ProviderKind, ProviderReference,
        merge,
    };
    pub use crate::error::{ConfigError, Result};
    pub use crate::sources::ConfigProvider;
}

//! Core configuration resolution types.

mod builder;
mod config_object;
mod merge;
mod params;
mod reference;
mod resolver;
mod secret;
mod uri;
mod validation;

pub use builder::ConfigResolverBuilder;
pub use config_object::{ConfigObject, DriverOptions};
pub use merge::merge;
pub use params::ParamStore;
pub use reference::{ProviderKind, ProviderReference};
pub use resolver::ConfigResolver;
pub use secret::{InlineAzureAuth, RawValue, SecretReference};
pub use uri::{VaultLocation, parse_vault_uri};
pub use validation::{Validate, is_pem, validate_wallet};

pub(crate) use config_object::parse_ttl;

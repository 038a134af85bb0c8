//! Configuration provider implementations.

mod document;
mod file;
mod provider;
mod secret_resolver;

#[cfg(feature = "azure")]
mod azure;
#[cfg(feature = "azure")]
pub(crate) mod azure_vault;
#[cfg(feature = "oci")]
mod oci;
#[cfg(feature = "oci")]
pub(crate) mod oci_vault;

pub use file::FileConfigProvider;
pub use provider::ConfigProvider;

#[cfg(feature = "azure")]
pub use azure::AzureConfigProvider;
#[cfg(feature = "azure")]
pub use azure_vault::AzureVaultProvider;
#[cfg(feature = "oci")]
pub use oci::{OciConfigProvider, parse_location};
#[cfg(feature = "oci")]
pub use oci_vault::OciVaultProvider;

//! Credential selection for each cloud ecosystem.
//!
//! Credentials are plain descriptions of the chosen strategy. The registered
//! client factories turn them into authenticated clients.

#[cfg(feature = "azure")]
mod azure;
#[cfg(feature = "oci")]
mod oci;

#[cfg(feature = "azure")]
pub use azure::{AzureCredential, inline_azure_credential, resolve_azure_credential};
#[cfg(feature = "oci")]
pub use oci::{OciCredential, OciProfile, load_profile, resolve_oci_credential, retrieve_region};

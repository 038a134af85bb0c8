//! Configuration provider trait.

use crate::core::{ConfigObject, ProviderKind};
use crate::error::Result;
use async_trait::async_trait;

/// Trait for cloud configuration providers.
///
/// A provider is built once per resolution from a location and its extended
/// parameters, and produces one [`ConfigObject`]. Implement this trait to add
/// a custom provider.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Fetch and assemble the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a mandatory fetch, authentication, secret lookup or
    /// wallet validation fails. Optional entries never cause an error.
    async fn return_config(&self) -> Result<ConfigObject>;

    /// The kind of provider.
    fn kind(&self) -> ProviderKind;

    /// Get a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> String;
}

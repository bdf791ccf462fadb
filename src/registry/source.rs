//! Registry capability contract implemented by every adapter

#[cfg(test)]
use mockall::automock;

use crate::search::error::RegistrySearchError;
use crate::search::types::{PackageInfo, Repository};

/// Queries one registry for a package and normalizes its response
///
/// Implementations are stateless between calls and safe to share across
/// concurrent searches.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait RegistrySource: Send + Sync {
    /// Which registry this adapter speaks to
    fn repository(&self) -> Repository;

    /// Looks up a package by name
    ///
    /// # Returns
    /// * `Ok(records)` - zero records means "checked, not present"
    /// * `Err(error)` - the registry could not be checked; this never
    ///   unwinds the surrounding search
    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError>;
}

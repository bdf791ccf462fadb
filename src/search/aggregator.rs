//! Merges per-registry outcomes for one package name

use serde::Serialize;

use crate::search::error::RegistrySearchError;
use crate::search::types::PackageInfo;

/// Everything learned about one package name across all registries
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    /// Successful records, in configured registry order
    pub infos: Vec<PackageInfo>,
    /// One entry per registry that could not be checked
    pub errors: Vec<RegistrySearchError>,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        !self.infos.is_empty()
    }

    /// True when every configured registry answered, so an empty `infos`
    /// really means "not found anywhere" rather than "could not check"
    pub fn checked_everywhere(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Folds the per-registry outcomes into one result, preserving the order
/// the outcomes were produced in (the configured registry order)
///
/// Failures land in the ledger without suppressing other registries'
/// records; an all-failed search yields empty `infos` plus a full ledger,
/// which callers can tell apart from a genuine miss.
pub fn aggregate(
    outcomes: impl IntoIterator<Item = Result<Vec<PackageInfo>, RegistrySearchError>>,
) -> SearchResult {
    let mut result = SearchResult::default();
    for outcome in outcomes {
        match outcome {
            Ok(infos) => result.infos.extend(infos),
            Err(err) => result.errors.push(err),
        }
    }
    result
}

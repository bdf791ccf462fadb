use thiserror::Error;

use crate::search::types::Repository;

/// Why a single (registry, package) lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorReason {
    /// Connection, DNS or TLS failure, or an error status from the server
    NetworkFailure,
    Timeout,
    RateLimited,
    /// Response shape was not what the adapter expected
    ParseFailure,
    /// The adapter deliberately declined the query
    Unsupported,
}

impl std::fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorReason::NetworkFailure => "network failure",
            ErrorReason::Timeout => "timeout",
            ErrorReason::RateLimited => "rate limited",
            ErrorReason::ParseFailure => "parse failure",
            ErrorReason::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// Failure of one registry lookup for one package name
///
/// This is collected data, not a call failure: the searcher gathers these
/// into the per-name error ledger and keeps going.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize)]
#[error("{repository}: {reason}{}", .detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
pub struct RegistrySearchError {
    pub repository: Repository,
    pub reason: ErrorReason,
    pub detail: Option<String>,
}

impl RegistrySearchError {
    pub fn new(repository: Repository, reason: ErrorReason) -> Self {
        Self {
            repository,
            reason,
            detail: None,
        }
    }

    pub fn with_detail(
        repository: Repository,
        reason: ErrorReason,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            reason,
            detail: Some(detail.into()),
        }
    }

    /// Maps a reqwest transport error onto the failure taxonomy
    pub fn from_http(repository: Repository, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            ErrorReason::Timeout
        } else if err.is_decode() {
            ErrorReason::ParseFailure
        } else {
            ErrorReason::NetworkFailure
        };
        Self::with_detail(repository, reason, err.to_string())
    }
}

/// Usage errors that fail the whole search call
///
/// Everything else (per-registry failures) is reported through
/// [`RegistrySearchError`] ledgers instead.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("no package names given")]
    EmptyQuery,
}

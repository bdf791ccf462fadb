//! Concurrent fan-out of package lookups across all configured registries

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use crate::registry;
use crate::registry::source::RegistrySource;
use crate::search::aggregator::{self, SearchResult};
use crate::search::error::{ErrorReason, RegistrySearchError, SearchError};
use crate::search::types::PackageInfo;

/// Fans one or more package names out to every configured registry and
/// aggregates the answers per name
///
/// Every (name, registry) pair is an independent lookup; the total number
/// of lookups is known up front and bounded by the concurrency cap. Results
/// are buffered and emitted in configured registry order no matter which
/// network response arrives first.
pub struct PackageSearcher {
    sources: Vec<Arc<dyn RegistrySource>>,
    concurrency: usize,
    timeout: Duration,
}

impl Default for PackageSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageSearcher {
    /// Searcher over the full built-in registry list
    pub fn new() -> Self {
        Self::with_sources(registry::default_sources())
    }

    /// Searcher over a caller-chosen registry set; the extension point for
    /// restricting or adding registries
    pub fn with_sources(sources: Vec<Arc<dyn RegistrySource>>) -> Self {
        Self {
            sources,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Caps how many lookups run at once (minimum 1)
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Per-(name, registry) deadline; an elapsed lookup resolves as a
    /// `Timeout` ledger entry instead of hanging the search
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Searches one package name across all registries
    pub async fn search_package(&self, name: &str) -> Result<SearchResult, SearchError> {
        let mut results = self.search_packages(&[name.to_string()]).await?;
        Ok(results.shift_remove(name).unwrap_or_default())
    }

    /// Searches every name across every registry, returning a mapping in
    /// the caller's name order
    ///
    /// Per-registry failures are collected into each name's ledger; the
    /// call itself fails only on usage errors.
    pub async fn search_packages(
        &self,
        names: &[String],
    ) -> Result<IndexMap<String, SearchResult>, SearchError> {
        if names.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        if self.sources.is_empty() {
            return Ok(names
                .iter()
                .map(|name| (name.clone(), SearchResult::default()))
                .collect());
        }

        debug!(
            packages = names.len(),
            registries = self.sources.len(),
            "starting search"
        );

        // One future per (name, registry) pair. `buffered` polls up to the
        // cap concurrently but yields in input order, which keeps each
        // name's records in configured registry order.
        let lookups = names.iter().flat_map(|name| {
            self.sources
                .iter()
                .map(move |source| self.find_with_timeout(Arc::clone(source), name))
        });

        let outcomes: Vec<Result<_, RegistrySearchError>> = futures::stream::iter(lookups)
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut results: IndexMap<String, SearchResult> = IndexMap::new();
        for (name, per_name) in names.iter().zip(outcomes.chunks(self.sources.len())) {
            results.insert(name.clone(), aggregator::aggregate(per_name.to_vec()));
        }

        Ok(results)
    }

    async fn find_with_timeout(
        &self,
        source: Arc<dyn RegistrySource>,
        name: &str,
    ) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let repository = source.repository();
        match tokio::time::timeout(self.timeout, source.find(name)).await {
            Ok(outcome) => {
                if let Err(err) = &outcome {
                    warn!(%repository, package = name, error = %err, "registry lookup failed");
                }
                outcome
            }
            Err(_) => {
                warn!(%repository, package = name, "registry lookup timed out");
                Err(RegistrySearchError::with_detail(
                    repository,
                    ErrorReason::Timeout,
                    format!("no response within {:?}", self.timeout),
                ))
            }
        }
    }
}

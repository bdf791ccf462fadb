//! Search orchestration: data model, aggregation and concurrent fan-out

pub mod aggregator;
pub mod error;
pub mod searcher;
pub mod types;

pub use aggregator::SearchResult;
pub use error::{ErrorReason, RegistrySearchError, SearchError};
pub use searcher::PackageSearcher;
pub use types::{PackageInfo, Repository, ThreadingSupport};

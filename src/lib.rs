//! pkgscout: find a package across many registries at once
//!
//! The crate fans a package name out to every configured registry adapter
//! concurrently, normalizes each registry's idiosyncratic response into
//! [`search::PackageInfo`] records, and aggregates the per-registry
//! outcomes so that one failing registry never loses another's answer.
//!
//! ```rust,ignore
//! use pkgscout::search::PackageSearcher;
//!
//! let searcher = PackageSearcher::new();
//! let result = searcher.search_package("samtools").await?;
//! for info in &result.infos {
//!     println!("{}: latest {}", info.repository, info.latest_version);
//! }
//! ```

pub mod config;
pub mod output;
pub mod registry;
pub mod search;
pub mod version;

//! Normalized package records shared by every registry adapter

use serde::Serialize;

use crate::version::grouper::{self, VersionGroup};

/// Identifies which registry produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Repository {
    Pypi,
    CratesIo,
    Anaconda,
    Bioconda,
    CondaForge,
    Bioconductor,
    Cran,
    Ropensci,
    Posit,
    Homebrew,
    DockerHub,
}

impl Repository {
    pub fn as_str(&self) -> &'static str {
        match self {
            Repository::Pypi => "PyPI",
            Repository::CratesIo => "crates.io",
            Repository::Anaconda => "Anaconda",
            Repository::Bioconda => "Bioconda",
            Repository::CondaForge => "Conda-forge",
            Repository::Bioconductor => "Bioconductor",
            Repository::Cran => "CRAN",
            Repository::Ropensci => "rOpenSci",
            Repository::Posit => "Posit Package Manager",
            Repository::Homebrew => "Homebrew",
            Repository::DockerHub => "Docker Hub",
        }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a package advertises multithreading in its metadata
///
/// `Unknown` means the registry gave us no text to scan, which is
/// different from scanning text and finding nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadingSupport {
    Explicit,
    NotDetected,
    Unknown,
}

/// Normalized record of one package's presence in one registry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageInfo {
    /// Package name as queried by the caller
    pub name: String,
    pub repository: Repository,
    /// Canonical link to the package page, empty if the registry has none
    pub url: String,
    pub description: String,
    /// Raw version strings as reported, never empty
    pub versions: Vec<String>,
    /// Versions partitioned by major.minor, ascending
    pub version_groups: Vec<VersionGroup>,
    pub latest_version: String,
    pub license: String,
    pub threading: ThreadingSupport,
    /// Thread-related flags spotted in the description (e.g. `--threads`)
    pub threading_flags: Vec<String>,
}

impl PackageInfo {
    /// Builds a record from raw registry data, deriving the version groups
    /// and latest version. Returns `None` when `versions` is empty: a
    /// registry that knows the package but reports no versions should be
    /// treated as "not found" rather than emit a record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        repository: Repository,
        url: impl Into<String>,
        description: impl Into<String>,
        versions: Vec<String>,
        license: Option<String>,
        threading: ThreadingSupport,
        threading_flags: Vec<String>,
    ) -> Option<Self> {
        let latest_version = grouper::latest_version(&versions)?;
        let version_groups = grouper::group_versions(&versions);

        Some(Self {
            name: name.into(),
            repository,
            url: url.into(),
            description: description.into(),
            versions,
            version_groups,
            latest_version,
            license: license
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            threading,
            threading_flags,
        })
    }
}

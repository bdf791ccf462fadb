//! Registry adapters and the capability contract they implement
//!
//! Each adapter owns its own wire details (REST call, HTML scrape) and its
//! own response normalization; the rest of the crate only sees
//! [`source::RegistrySource`].

use std::sync::Arc;

pub mod bioconductor;
pub mod conda;
pub mod cran;
pub mod crates_io;
pub mod docker_hub;
pub mod homebrew;
pub mod posit;
pub mod pypi;
pub mod ropensci;
pub mod source;
pub mod threading;

pub use bioconductor::BioconductorSource;
pub use conda::CondaSource;
pub use cran::CranSource;
pub use crates_io::CratesIoSource;
pub use docker_hub::DockerHubSource;
pub use homebrew::HomebrewSource;
pub use posit::PositSource;
pub use pypi::PypiSource;
pub use ropensci::RopensciSource;
pub use source::RegistrySource;

/// The full built-in registry list, in the order results are reported
pub fn default_sources() -> Vec<Arc<dyn RegistrySource>> {
    vec![
        Arc::new(CondaSource::bioconda()),
        Arc::new(CondaSource::anaconda()),
        Arc::new(CondaSource::conda_forge()),
        Arc::new(PypiSource::default()),
        Arc::new(CratesIoSource::default()),
        Arc::new(BioconductorSource::default()),
        Arc::new(CranSource::default()),
        Arc::new(RopensciSource::default()),
        Arc::new(PositSource::default()),
        Arc::new(HomebrewSource::default()),
        Arc::new(DockerHubSource::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_sources_have_distinct_repositories() {
        let sources = default_sources();
        let repos: HashSet<_> = sources.iter().map(|s| s.repository()).collect();
        assert_eq!(repos.len(), sources.len());
    }
}

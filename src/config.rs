use std::sync::Arc;

use serde::Deserialize;

use crate::registry::{
    BioconductorSource, CondaSource, CranSource, CratesIoSource, DockerHubSource, HomebrewSource,
    PositSource, PypiSource, RegistrySource, RopensciSource,
};

/// How many (name, registry) lookups run at once
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Per-(name, registry) deadline in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Search configuration, loadable from a JSON file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub registries: RegistriesConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            registries: RegistriesConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Builds the registry set this config enables, in reporting order
    pub fn sources(&self) -> Vec<Arc<dyn RegistrySource>> {
        let r = &self.registries;
        let all: Vec<(bool, Arc<dyn RegistrySource>)> = vec![
            (r.bioconda.enabled, Arc::new(CondaSource::bioconda())),
            (r.anaconda.enabled, Arc::new(CondaSource::anaconda())),
            (r.conda_forge.enabled, Arc::new(CondaSource::conda_forge())),
            (r.pypi.enabled, Arc::new(PypiSource::default())),
            (r.crates.enabled, Arc::new(CratesIoSource::default())),
            (
                r.bioconductor.enabled,
                Arc::new(BioconductorSource::default()),
            ),
            (r.cran.enabled, Arc::new(CranSource::default())),
            (r.ropensci.enabled, Arc::new(RopensciSource::default())),
            (r.posit.enabled, Arc::new(PositSource::default())),
            (r.homebrew.enabled, Arc::new(HomebrewSource::default())),
            (r.docker_hub.enabled, Arc::new(DockerHubSource::default())),
        ];
        all.into_iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, source)| source)
            .collect()
    }
}

/// Per-registry enable switches
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RegistriesConfig {
    pub bioconda: RegistryConfig,
    pub anaconda: RegistryConfig,
    #[serde(rename = "condaForge")]
    pub conda_forge: RegistryConfig,
    pub pypi: RegistryConfig,
    pub crates: RegistryConfig,
    pub bioconductor: RegistryConfig,
    pub cran: RegistryConfig,
    pub ropensci: RegistryConfig,
    pub posit: RegistryConfig,
    pub homebrew: RegistryConfig,
    #[serde(rename = "dockerHub")]
    pub docker_hub: RegistryConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    pub enabled: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use serde_json::json;

    #[test]
    fn partial_config_uses_defaults_for_missing_fields() {
        let config = serde_json::from_value::<SearchConfig>(json!({
            "concurrency": 4
        }))
        .unwrap();

        assert_eq!(config.concurrency, 4);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.registries, RegistriesConfig::default());
    }

    #[test]
    fn default_config_enables_every_registry() {
        let config = SearchConfig::default();
        assert_eq!(config.sources().len(), registry::default_sources().len());
    }

    #[test]
    fn disabled_registries_are_excluded_from_the_source_set() {
        let config = serde_json::from_value::<SearchConfig>(json!({
            "registries": {
                "dockerHub": { "enabled": false },
                "cran": { "enabled": false },
                "ropensci": { "enabled": false }
            }
        }))
        .unwrap();

        let sources = config.sources();
        assert_eq!(sources.len(), registry::default_sources().len() - 3);
        assert!(
            !sources
                .iter()
                .any(|s| s.repository() == crate::search::types::Repository::DockerHub)
        );
    }
}

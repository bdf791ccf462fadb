//! Homebrew formulae API adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::registry::source::RegistrySource;
use crate::registry::threading::detect_threading;
use crate::search::error::{ErrorReason, RegistrySearchError};
use crate::search::types::{PackageInfo, Repository};

const DEFAULT_HOMEBREW_URL: &str = "https://formulae.brew.sh";

pub struct HomebrewSource {
    client: Client,
    base_url: String,
}

impl Default for HomebrewSource {
    fn default() -> Self {
        Self::new(DEFAULT_HOMEBREW_URL)
    }
}

impl HomebrewSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("pkgscout")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }
}

/// formulae.brew.sh formula endpoint response
#[derive(Debug, Deserialize)]
struct Formula {
    name: String,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    license: Option<String>,
    versions: FormulaVersions,
}

#[derive(Debug, Deserialize)]
struct FormulaVersions {
    #[serde(default)]
    stable: Option<String>,
}

#[async_trait]
impl RegistrySource for HomebrewSource {
    fn repository(&self) -> Repository {
        Repository::Homebrew
    }

    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let url = format!("{}/api/formula/{}.json", self.base_url, package_name);
        debug!("Fetching Homebrew formula: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistrySearchError::from_http(self.repository(), e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(vec![]);
        }
        if !status.is_success() {
            return Err(RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::NetworkFailure,
                format!("Homebrew API returned status {status}"),
            ));
        }

        let formula: Formula = response.json().await.map_err(|e| {
            RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                e.to_string(),
            )
        })?;

        // Homebrew tracks a single stable version per formula
        let versions: Vec<String> = formula.versions.stable.into_iter().collect();

        let description = formula.desc.unwrap_or_default();
        let (threading, flags) = detect_threading(&description, None);

        Ok(PackageInfo::new(
            package_name,
            self.repository(),
            format!("https://formulae.brew.sh/formula/{}", formula.name),
            description,
            versions,
            formula.license,
            threading,
            flags,
        )
        .into_iter()
        .collect())
    }
}

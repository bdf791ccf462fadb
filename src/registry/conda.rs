//! anaconda.org channel adapter (Anaconda, Bioconda, Conda-forge)
//!
//! All three channels share the same API, so one adapter covers them,
//! parameterized by channel name and repository tag.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::registry::source::RegistrySource;
use crate::registry::threading::detect_threading;
use crate::search::error::{ErrorReason, RegistrySearchError};
use crate::search::types::{PackageInfo, Repository};

const DEFAULT_ANACONDA_API_URL: &str = "https://api.anaconda.org";

pub struct CondaSource {
    client: Client,
    base_url: String,
    channel: String,
    repository: Repository,
}

impl CondaSource {
    pub fn new(base_url: impl Into<String>, channel: impl Into<String>, repository: Repository) -> Self {
        Self {
            client: Client::builder()
                .user_agent("pkgscout")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            channel: channel.into(),
            repository,
        }
    }

    pub fn anaconda() -> Self {
        Self::new(DEFAULT_ANACONDA_API_URL, "anaconda", Repository::Anaconda)
    }

    pub fn bioconda() -> Self {
        Self::new(DEFAULT_ANACONDA_API_URL, "bioconda", Repository::Bioconda)
    }

    pub fn conda_forge() -> Self {
        Self::new(
            DEFAULT_ANACONDA_API_URL,
            "conda-forge",
            Repository::CondaForge,
        )
    }

    async fn lookup(
        &self,
        package_name: &str,
    ) -> Result<Option<CondaPackage>, RegistrySearchError> {
        let url = format!(
            "{}/package/{}/{}",
            self.base_url, self.channel, package_name
        );
        debug!("Fetching conda package: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistrySearchError::from_http(self.repository, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RegistrySearchError::new(
                self.repository,
                ErrorReason::RateLimited,
            ));
        }
        if !status.is_success() {
            return Err(RegistrySearchError::with_detail(
                self.repository,
                ErrorReason::NetworkFailure,
                format!("anaconda.org API returned status {status}"),
            ));
        }

        response.json().await.map(Some).map_err(|e| {
            RegistrySearchError::with_detail(self.repository, ErrorReason::ParseFailure, e.to_string())
        })
    }
}

/// anaconda.org package endpoint response
#[derive(Debug, Deserialize)]
struct CondaPackage {
    name: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    versions: Vec<String>,
}

#[async_trait]
impl RegistrySource for CondaSource {
    fn repository(&self) -> Repository {
        self.repository
    }

    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let mut package = self.lookup(package_name).await?;

        // R/Bioconductor builds live under a bioconductor- prefix on the
        // bioconda channel, so a miss there gets a second chance.
        if package.is_none() && self.channel == "bioconda" {
            package = self
                .lookup(&format!("bioconductor-{package_name}"))
                .await?;
        }

        let Some(package) = package else {
            return Ok(vec![]);
        };

        let summary = package.summary.unwrap_or_default();
        let (threading, flags) = detect_threading(&summary, None);

        Ok(PackageInfo::new(
            package_name,
            self.repository,
            format!("https://anaconda.org/{}/{}", self.channel, package.name),
            summary,
            package.versions,
            package.license,
            threading,
            flags,
        )
        .into_iter()
        .collect())
    }
}

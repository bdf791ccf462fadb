//! PyPI registry adapter

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::registry::source::RegistrySource;
use crate::registry::threading::detect_threading;
use crate::search::error::{ErrorReason, RegistrySearchError};
use crate::search::types::{PackageInfo, Repository};

const DEFAULT_PYPI_URL: &str = "https://pypi.org";

pub struct PypiSource {
    client: Client,
    base_url: String,
}

impl Default for PypiSource {
    fn default() -> Self {
        Self::new(DEFAULT_PYPI_URL)
    }
}

impl PypiSource {
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

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
    releases: HashMap<String, Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    #[serde(default)]
    summary: Option<String>,
    /// Long-form readme text
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    license: Option<String>,
}

#[async_trait]
impl RegistrySource for PypiSource {
    fn repository(&self) -> Repository {
        Repository::Pypi
    }

    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let url = format!("{}/pypi/{}/json", self.base_url, package_name);
        debug!("Fetching PyPI package: {}", url);

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
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RegistrySearchError::new(
                self.repository(),
                ErrorReason::RateLimited,
            ));
        }
        if !status.is_success() {
            return Err(RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::NetworkFailure,
                format!("PyPI API returned status {status}"),
            ));
        }

        let body: PypiResponse = response.json().await.map_err(|e| {
            RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                e.to_string(),
            )
        })?;

        // Releases without files are placeholders, not installable versions
        let versions: Vec<String> = body
            .releases
            .iter()
            .filter(|(_, files)| !files.is_empty())
            .map(|(version, _)| version.clone())
            .collect();

        let summary = body.info.summary.unwrap_or_default();
        let (threading, flags) =
            detect_threading(&summary, body.info.description.as_deref());

        debug!(
            "Found {} versions for package {}",
            versions.len(),
            package_name
        );

        Ok(PackageInfo::new(
            package_name,
            self.repository(),
            format!("https://pypi.org/project/{package_name}"),
            summary,
            versions,
            body.info.license,
            threading,
            flags,
        )
        .into_iter()
        .collect())
    }
}

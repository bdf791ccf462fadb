//! crates.io registry adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::registry::source::RegistrySource;
use crate::registry::threading::detect_threading;
use crate::search::error::{ErrorReason, RegistrySearchError};
use crate::search::types::{PackageInfo, Repository};

const DEFAULT_CRATES_IO_URL: &str = "https://crates.io";

pub struct CratesIoSource {
    client: Client,
    base_url: String,
}

impl Default for CratesIoSource {
    fn default() -> Self {
        Self::new(DEFAULT_CRATES_IO_URL)
    }
}

impl CratesIoSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            // crates.io rejects requests without a user agent
            client: Client::builder()
                .user_agent("pkgscout")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CratesIoResponse {
    #[serde(rename = "crate")]
    krate: CrateMeta,
    versions: Vec<CrateVersion>,
}

#[derive(Debug, Deserialize)]
struct CrateMeta {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrateVersion {
    num: String,
    #[serde(default)]
    yanked: bool,
    #[serde(default)]
    license: Option<String>,
}

#[async_trait]
impl RegistrySource for CratesIoSource {
    fn repository(&self) -> Repository {
        Repository::CratesIo
    }

    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let url = format!("{}/api/v1/crates/{}", self.base_url, package_name);
        debug!("Fetching crates.io package: {}", url);

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
                format!("crates.io API returned status {status}"),
            ));
        }

        let body: CratesIoResponse = response.json().await.map_err(|e| {
            RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                e.to_string(),
            )
        })?;

        // The API lists versions newest first; the first unyanked entry
        // carries the license of the current release.
        let license = body
            .versions
            .iter()
            .find(|v| !v.yanked)
            .and_then(|v| v.license.clone());
        let versions: Vec<String> = body
            .versions
            .into_iter()
            .filter(|v| !v.yanked)
            .map(|v| v.num)
            .collect();

        let description = body.krate.description.unwrap_or_default();
        let (threading, flags) = detect_threading(&description, None);

        Ok(PackageInfo::new(
            package_name,
            self.repository(),
            format!("https://crates.io/crates/{package_name}"),
            description,
            versions,
            license,
            threading,
            flags,
        )
        .into_iter()
        .collect())
    }
}

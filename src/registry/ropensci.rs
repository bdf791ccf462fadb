//! rOpenSci r-universe adapter
//!
//! r-universe serves R DESCRIPTION fields as JSON, so the keys are
//! capitalized (`Version`, `License`, `Description`).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::registry::source::RegistrySource;
use crate::registry::threading::detect_threading;
use crate::search::error::{ErrorReason, RegistrySearchError};
use crate::search::types::{PackageInfo, Repository};

const DEFAULT_ROPENSCI_URL: &str = "https://ropensci.r-universe.dev/api";

pub struct RopensciSource {
    client: Client,
    base_url: String,
}

impl Default for RopensciSource {
    fn default() -> Self {
        Self::new(DEFAULT_ROPENSCI_URL)
    }
}

impl RopensciSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("pkgscout")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// Past releases from the versions endpoint; best-effort, a miss
    /// falls back to the current release only.
    async fn version_history(
        &self,
        package_name: &str,
    ) -> Result<Vec<String>, RegistrySearchError> {
        let url = format!("{}/versions/{}", self.base_url, package_name);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistrySearchError::from_http(self.repository(), e))?;

        if !response.status().is_success() {
            return Ok(vec![]);
        }

        let entries: Vec<VersionEntry> = response.json().await.map_err(|e| {
            RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                e.to_string(),
            )
        })?;

        Ok(entries.into_iter().filter_map(|e| e.version).collect())
    }
}

/// r-universe package endpoint response (DESCRIPTION field casing)
#[derive(Debug, Deserialize)]
struct RUniversePackage {
    #[serde(rename = "Version")]
    version: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "License", default)]
    license: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    #[serde(rename = "Version")]
    version: Option<String>,
}

#[async_trait]
impl RegistrySource for RopensciSource {
    fn repository(&self) -> Repository {
        Repository::Ropensci
    }

    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let url = format!("{}/packages/{}", self.base_url, package_name);
        debug!("Fetching rOpenSci package: {}", url);

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
                format!("r-universe API returned status {status}"),
            ));
        }

        let package: RUniversePackage = response.json().await.map_err(|e| {
            RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                e.to_string(),
            )
        })?;

        let mut versions = self.version_history(package_name).await?;
        if versions.is_empty() {
            versions.extend(package.version);
        }

        let description = package.description.unwrap_or_default();
        let (threading, flags) = detect_threading(&description, None);

        Ok(PackageInfo::new(
            package_name,
            self.repository(),
            format!("https://ropensci.r-universe.dev/packages/{package_name}"),
            description,
            versions,
            package.license,
            threading,
            flags,
        )
        .into_iter()
        .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn find_normalizes_a_package_with_history() {
        let mut server = Server::new_async().await;
        let package = server
            .mock("GET", "/packages/targets")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "Package": "targets",
                    "Version": "1.7.1",
                    "Description": "Pipeline toolkit with parallel workers",
                    "License": "MIT + file LICENSE"
                }"#,
            )
            .create_async()
            .await;
        let history = server
            .mock("GET", "/versions/targets")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"Version": "1.6.0"}, {"Version": "1.7.0"}, {"Version": "1.7.1"}]"#)
            .create_async()
            .await;

        let source = RopensciSource::new(server.url());
        let infos = source.find("targets").await.unwrap();

        package.assert_async().await;
        history.assert_async().await;

        assert_eq!(infos.len(), 1);
        let info = &infos[0];
        assert_eq!(info.repository, Repository::Ropensci);
        assert_eq!(info.versions, vec!["1.6.0", "1.7.0", "1.7.1"]);
        assert_eq!(info.latest_version, "1.7.1");
        assert_eq!(info.license, "MIT + file LICENSE");
        assert_eq!(info.url, "https://ropensci.r-universe.dev/packages/targets");
    }

    #[tokio::test]
    async fn missing_history_falls_back_to_current_release() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/packages/drake")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Package": "drake", "Version": "7.13.9"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/versions/drake")
            .with_status(404)
            .create_async()
            .await;

        let source = RopensciSource::new(server.url());
        let infos = source.find("drake").await.unwrap();

        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].versions, vec!["7.13.9"]);
    }

    #[tokio::test]
    async fn unknown_package_is_a_clean_miss() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/packages/nosuchpkg")
            .with_status(404)
            .create_async()
            .await;

        let source = RopensciSource::new(server.url());
        let infos = source.find("nosuchpkg").await.unwrap();

        assert!(infos.is_empty());
    }

    #[tokio::test]
    async fn server_error_status_is_a_network_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/packages/targets")
            .with_status(502)
            .create_async()
            .await;

        let source = RopensciSource::new(server.url());
        let err = source.find("targets").await.unwrap_err();

        assert_eq!(err.reason, ErrorReason::NetworkFailure);
        assert!(err.detail.unwrap().contains("502"));
    }
}

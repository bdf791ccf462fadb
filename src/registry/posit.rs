//! Posit Package Manager adapter
//!
//! Same R DESCRIPTION-cased JSON as r-universe, but with the version
//! history nested under the package resource.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::registry::source::RegistrySource;
use crate::registry::threading::detect_threading;
use crate::search::error::{ErrorReason, RegistrySearchError};
use crate::search::types::{PackageInfo, Repository};

const DEFAULT_POSIT_URL: &str = "https://packagemanager.posit.co/client";

pub struct PositSource {
    client: Client,
    base_url: String,
}

impl Default for PositSource {
    fn default() -> Self {
        Self::new(DEFAULT_POSIT_URL)
    }
}

impl PositSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("pkgscout")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    /// Past releases; best-effort, a miss falls back to the current one.
    async fn version_history(
        &self,
        package_name: &str,
    ) -> Result<Vec<String>, RegistrySearchError> {
        let url = format!("{}/packages/{}/versions", self.base_url, package_name);
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

#[derive(Debug, Deserialize)]
struct PositPackage {
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
impl RegistrySource for PositSource {
    fn repository(&self) -> Repository {
        Repository::Posit
    }

    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let url = format!("{}/packages/{}", self.base_url, package_name);
        debug!("Fetching Posit package: {}", url);

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
                format!("Posit API returned status {status}"),
            ));
        }

        let package: PositPackage = response.json().await.map_err(|e| {
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
            format!("https://packagemanager.posit.co/client/packages/{package_name}"),
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
    async fn find_normalizes_a_package() {
        let mut server = Server::new_async().await;
        let package = server
            .mock("GET", "/packages/data.table")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "Package": "data.table",
                    "Version": "1.15.4",
                    "Description": "Fast aggregation of large data, multithreaded via setDTthreads",
                    "License": "MPL-2.0"
                }"#,
            )
            .create_async()
            .await;
        let history = server
            .mock("GET", "/packages/data.table/versions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"Version": "1.14.10"}, {"Version": "1.15.0"}, {"Version": "1.15.4"}]"#)
            .create_async()
            .await;

        let source = PositSource::new(server.url());
        let infos = source.find("data.table").await.unwrap();

        package.assert_async().await;
        history.assert_async().await;

        assert_eq!(infos.len(), 1);
        let info = &infos[0];
        assert_eq!(info.repository, Repository::Posit);
        assert_eq!(info.latest_version, "1.15.4");
        assert_eq!(info.license, "MPL-2.0");
        assert_eq!(
            info.threading,
            crate::search::types::ThreadingSupport::Explicit
        );
    }

    #[tokio::test]
    async fn unknown_package_is_a_clean_miss() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/packages/nope")
            .with_status(404)
            .create_async()
            .await;

        let source = PositSource::new(server.url());
        let infos = source.find("nope").await.unwrap();

        assert!(infos.is_empty());
    }

    #[tokio::test]
    async fn package_without_any_version_is_a_miss() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/packages/stub")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"Package": "stub"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/packages/stub/versions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let source = PositSource::new(server.url());
        let infos = source.find("stub").await.unwrap();

        assert!(infos.is_empty());
    }
}

//! Docker Hub adapter
//!
//! Looks packages up as official images (the `library/` namespace), which
//! is where searches for plain tool names land. Tags double as versions;
//! the floating `latest` tag is excluded from the version set.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::registry::source::RegistrySource;
use crate::registry::threading::detect_threading;
use crate::search::error::{ErrorReason, RegistrySearchError};
use crate::search::types::{PackageInfo, Repository};

const DEFAULT_DOCKER_HUB_URL: &str = "https://hub.docker.com";

pub struct DockerHubSource {
    client: Client,
    base_url: String,
}

impl Default for DockerHubSource {
    fn default() -> Self {
        Self::new(DEFAULT_DOCKER_HUB_URL)
    }
}

impl DockerHubSource {
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

#[derive(Debug, Deserialize)]
struct RepositoryMeta {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsPage {
    #[serde(default)]
    results: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

#[async_trait]
impl RegistrySource for DockerHubSource {
    fn repository(&self) -> Repository {
        Repository::DockerHub
    }

    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let repo_path = format!("library/{package_name}");
        let meta_url = format!("{}/v2/repositories/{}", self.base_url, repo_path);
        debug!("Fetching Docker Hub repository: {}", meta_url);

        let response = self
            .client
            .get(&meta_url)
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
                format!("Docker Hub returned status {status}"),
            ));
        }

        let meta: RepositoryMeta = response.json().await.map_err(|e| {
            RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                e.to_string(),
            )
        })?;

        let tags_url = format!(
            "{}/v2/repositories/{}/tags?page_size=100",
            self.base_url, repo_path
        );
        let tags_response = self
            .client
            .get(&tags_url)
            .send()
            .await
            .map_err(|e| RegistrySearchError::from_http(self.repository(), e))?;

        if !tags_response.status().is_success() {
            return Err(RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::NetworkFailure,
                format!("Docker Hub tags returned status {}", tags_response.status()),
            ));
        }

        let tags: TagsPage = tags_response.json().await.map_err(|e| {
            RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                e.to_string(),
            )
        })?;

        let versions: Vec<String> = tags
            .results
            .into_iter()
            .map(|t| t.name)
            .filter(|name| name != "latest")
            .collect();

        let description = meta.description.unwrap_or_default();
        let (threading, flags) = detect_threading(&description, None);

        Ok(PackageInfo::new(
            package_name,
            self.repository(),
            format!("https://hub.docker.com/_/{package_name}"),
            description,
            versions,
            None, // Docker Hub does not expose image licenses
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
    async fn find_uses_tags_as_versions_without_latest() {
        let mut server = Server::new_async().await;
        let meta = server
            .mock("GET", "/v2/repositories/library/redis")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"description": "Redis is an in-memory database"}"#)
            .create_async()
            .await;
        let tags = server
            .mock("GET", "/v2/repositories/library/redis/tags")
            .match_query(mockito::Matcher::UrlEncoded(
                "page_size".into(),
                "100".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results": [
                    {"name": "latest"},
                    {"name": "7.2"},
                    {"name": "7.4"},
                    {"name": "6.2.14"}
                ]}"#,
            )
            .create_async()
            .await;

        let source = DockerHubSource::new(server.url());
        let infos = source.find("redis").await.unwrap();

        meta.assert_async().await;
        tags.assert_async().await;

        assert_eq!(infos.len(), 1);
        let info = &infos[0];
        assert!(!info.versions.contains(&"latest".to_string()));
        assert_eq!(info.latest_version, "7.4");
        assert_eq!(info.url, "https://hub.docker.com/_/redis");
        assert_eq!(info.license, "Unknown");
    }

    #[tokio::test]
    async fn unknown_image_is_a_clean_miss() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v2/repositories/library/nosuchimage")
            .with_status(404)
            .create_async()
            .await;

        let source = DockerHubSource::new(server.url());
        let infos = source.find("nosuchimage").await.unwrap();

        assert!(infos.is_empty());
    }

    #[tokio::test]
    async fn image_with_only_latest_tag_is_a_miss() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v2/repositories/library/rolling")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"description": "rolling release"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/repositories/library/rolling/tags")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": [{"name": "latest"}]}"#)
            .create_async()
            .await;

        let source = DockerHubSource::new(server.url());
        let infos = source.find("rolling").await.unwrap();

        assert!(infos.is_empty());
    }
}

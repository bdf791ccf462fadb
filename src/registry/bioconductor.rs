//! Bioconductor adapter
//!
//! Bioconductor publishes release metadata as one DCF file (the VIEWS
//! index, Debian-control style `Key: value` stanzas separated by blank
//! lines). One fetch covers every package in the current release.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::registry::source::RegistrySource;
use crate::registry::threading::detect_threading;
use crate::search::error::{ErrorReason, RegistrySearchError};
use crate::search::types::{PackageInfo, Repository};

const DEFAULT_BIOCONDUCTOR_URL: &str = "https://bioconductor.org";

pub struct BioconductorSource {
    client: Client,
    base_url: String,
}

impl Default for BioconductorSource {
    fn default() -> Self {
        Self::new(DEFAULT_BIOCONDUCTOR_URL)
    }
}

impl BioconductorSource {
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

/// First value for `key` within one DCF stanza
fn dcf_field<'a>(stanza: &'a str, key: &str) -> Option<&'a str> {
    stanza
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix(": "))
        .map(str::trim)
}

fn find_stanza<'a>(views: &'a str, package_name: &str) -> Option<&'a str> {
    views
        .split("\n\n")
        .find(|stanza| dcf_field(stanza, "Package") == Some(package_name))
}

#[async_trait]
impl RegistrySource for BioconductorSource {
    fn repository(&self) -> Repository {
        Repository::Bioconductor
    }

    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let url = format!("{}/packages/release/bioc/VIEWS", self.base_url);
        debug!("Fetching Bioconductor VIEWS index: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RegistrySearchError::from_http(self.repository(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::NetworkFailure,
                format!("Bioconductor returned status {status}"),
            ));
        }

        let views = response.text().await.map_err(|e| {
            RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                e.to_string(),
            )
        })?;

        // A name absent from the index is a miss, not an error
        let Some(stanza) = find_stanza(&views, package_name) else {
            return Ok(vec![]);
        };

        let versions: Vec<String> = dcf_field(stanza, "Version")
            .map(str::to_string)
            .into_iter()
            .collect();
        let license = dcf_field(stanza, "License").map(str::to_string);
        let description = dcf_field(stanza, "Title").unwrap_or_default().to_string();

        let (threading, flags) = detect_threading(&description, None);

        Ok(PackageInfo::new(
            package_name,
            self.repository(),
            format!("https://bioconductor.org/packages/release/bioc/html/{package_name}.html"),
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

//! CRAN adapter
//!
//! CRAN has no JSON API for package metadata; the fields are scraped out
//! of the package's HTML index page, whose `Field:</td><td>value</td>`
//! table rows have been stable for years.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::debug;

use crate::registry::source::RegistrySource;
use crate::registry::threading::detect_threading;
use crate::search::error::{ErrorReason, RegistrySearchError};
use crate::search::types::{PackageInfo, Repository};

const DEFAULT_CRAN_URL: &str = "https://cran.r-project.org";

static VERSION_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Version:</td>\s*<td>([^<]+)</td>").expect("version row pattern is valid")
});
static LICENSE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"License:</td>\s*<td>\s*(?:<a[^>]*>)?([^<]+)").expect("license row pattern is valid")
});
static DESCRIPTION_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<p>(.*?)</p>").expect("description pattern is valid")
});

pub struct CranSource {
    client: Client,
    base_url: String,
}

impl Default for CranSource {
    fn default() -> Self {
        Self::new(DEFAULT_CRAN_URL)
    }
}

impl CranSource {
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

#[async_trait]
impl RegistrySource for CranSource {
    fn repository(&self) -> Repository {
        Repository::Cran
    }

    async fn find(&self, package_name: &str) -> Result<Vec<PackageInfo>, RegistrySearchError> {
        let url = format!(
            "{}/web/packages/{}/index.html",
            self.base_url, package_name
        );
        debug!("Fetching CRAN package page: {}", url);

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
                format!("CRAN returned status {status}"),
            ));
        }

        let html = response.text().await.map_err(|e| {
            RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                e.to_string(),
            )
        })?;

        // A page without a Version row is not a package page
        let Some(version) = VERSION_ROW
            .captures(&html)
            .map(|c| c[1].trim().to_string())
        else {
            return Err(RegistrySearchError::with_detail(
                self.repository(),
                ErrorReason::ParseFailure,
                "package page has no Version row",
            ));
        };

        let license = LICENSE_ROW.captures(&html).map(|c| c[1].trim().to_string());
        let description = DESCRIPTION_BLOCK
            .captures(&html)
            .map(|c| collapse_whitespace(&c[1]))
            .unwrap_or_default();

        let (threading, flags) = detect_threading(&description, None);

        Ok(PackageInfo::new(
            package_name,
            self.repository(),
            url,
            description,
            vec![version],
            license,
            threading,
            flags,
        )
        .into_iter()
        .collect())
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

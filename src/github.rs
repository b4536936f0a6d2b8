use std::time::Duration;

use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::{config::Config, error::SearchError};

/// GitHub never returns more than this per page for our searches.
pub const PAGE_SIZE: u32 = 10;

const USER_AGENT: &str = "repo-health-search";

#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRepositoriesPage {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<RepositoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryItem {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub language: Option<String>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub open_issues_count: u64,
    pub forks_count: u64,
    pub license: Option<License>,
    pub topics: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct License {
    pub name: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.search_timeout_secs))
            .build()
            .wrap_err("Failed to create GitHub HTTP client")?;

        Ok(Self {
            client,
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Runs one repository search, most-starred first.
    #[instrument(skip(self))]
    pub async fn search_repositories(
        &self,
        query: &str,
        page: u32,
    ) -> Result<SearchRepositoriesPage, SearchError> {
        let token = self.token.as_deref().ok_or_else(|| {
            SearchError::Configuration("GitHub API key not configured".to_string())
        })?;

        let url = format!("{}/search/repositories", self.api_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query.to_string()),
                ("sort", "stars".to_string()),
                ("order", "desc".to_string()),
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ])
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("GitHub API error: Status: {status}, Body: {text}");
            return Err(SearchError::UpstreamStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let mut page: SearchRepositoriesPage = serde_json::from_str(&text).inspect_err(|e| {
            error!("Failed to parse GitHub search response: {e}");
        })?;
        page.items.truncate(PAGE_SIZE as usize);

        debug!(
            "GitHub returned {} of {} repositories",
            page.items.len(),
            page.total_count
        );
        Ok(page)
    }
}

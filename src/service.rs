use chrono::{NaiveDate, Utc};
use eyre::Result;
use tracing::{info, instrument};

use crate::{
    config::Config,
    enrich::enrich_all,
    error::SearchError,
    gemini::GeminiClient,
    github::GitHubClient,
    models::{RepositoryResult, SearchResponse},
    query::{build_upstream_query, SearchMode, SearchRequest},
};

/// The search proxy: GitHub search plus optional Gemini summaries.
#[derive(Debug, Clone)]
pub struct SearchService {
    github: GitHubClient,
    gemini: GeminiClient,
}

impl SearchService {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            github: GitHubClient::new(config)?,
            gemini: GeminiClient::new(config)?,
        })
    }

    pub async fn handle(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.handle_on(request, Utc::now().date_naive()).await
    }

    /// Same as [`Self::handle`] with an explicit current date for the
    /// freshness qualifier.
    #[instrument(skip(self), fields(query = %request.query, mode = ?request.mode))]
    pub async fn handle_on(
        &self,
        request: &SearchRequest,
        today: NaiveDate,
    ) -> Result<SearchResponse, SearchError> {
        if !self.github.is_configured() {
            return Err(SearchError::Configuration(
                "GitHub API key not configured".to_string(),
            ));
        }
        if request.mode == SearchMode::Enriched && !self.gemini.is_configured() {
            return Err(SearchError::Configuration(
                "Gemini API key not configured".to_string(),
            ));
        }

        let upstream_query = build_upstream_query(request, today);
        info!("Searching GitHub with query: {upstream_query}");

        let page = self
            .github
            .search_repositories(&upstream_query, request.page)
            .await?;

        let repos: Vec<RepositoryResult> =
            page.items.into_iter().map(RepositoryResult::from).collect();

        let repos = match request.mode {
            SearchMode::Plain => repos,
            SearchMode::Enriched => enrich_all(&self.gemini, repos).await,
        };

        Ok(SearchResponse {
            repos,
            total_count: page.total_count,
        })
    }
}

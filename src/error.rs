use thiserror::Error;

/// Failures that abort a search request.
///
/// Enrichment failures are deliberately absent: they are recovered per item
/// and never reach the caller.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("GitHub API error: {status}")]
    UpstreamStatus { status: u16, body: String },

    #[error("GitHub API request failed: {0}")]
    UpstreamTransport(#[from] reqwest::Error),

    #[error("GitHub API returned a malformed payload: {0}")]
    UpstreamPayload(#[from] serde_json::Error),
}

impl SearchError {
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamStatus { .. } | Self::UpstreamTransport(_) | Self::UpstreamPayload(_)
        )
    }
}

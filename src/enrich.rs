//! Attaches generated summaries to search results.
//!
//! Every result gets its own call and its own error boundary. A failed call
//! falls back to the repository description; it never drops the result or
//! fails the search.

use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::{
    gemini::{summary_prompt, GeminiClient},
    models::RepositoryResult,
};

/// Only the first page is ever enriched.
pub const ENRICHMENT_LIMIT: usize = 10;

pub const NO_DESCRIPTION: &str = "No description available";

/// Outcome of one enrichment call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Generated(String),
    Fallback { reason: String },
}

impl Enrichment {
    /// The summary to show: generated text, else the description as-is,
    /// else a fixed placeholder.
    pub fn into_summary(self, description: Option<&str>) -> String {
        match self {
            Self::Generated(text) => text,
            Self::Fallback { .. } => description
                .filter(|d| !d.is_empty())
                .unwrap_or(NO_DESCRIPTION)
                .to_string(),
        }
    }
}

#[instrument(skip_all, fields(repo = %repo.full_name))]
async fn enrich_one(gemini: &GeminiClient, repo: &RepositoryResult) -> Enrichment {
    // generate_text rejects blank output, so any Ok is usable as-is
    match gemini.generate_text(&summary_prompt(repo)).await {
        Ok(text) => Enrichment::Generated(text),
        Err(e) => Enrichment::Fallback {
            reason: format!("{e:#}"),
        },
    }
}

/// Enriches up to [`ENRICHMENT_LIMIT`] results concurrently. Output order is
/// input order regardless of which call finishes first.
#[instrument(skip_all, fields(count = repos.len()))]
pub async fn enrich_all(
    gemini: &GeminiClient,
    mut repos: Vec<RepositoryResult>,
) -> Vec<RepositoryResult> {
    repos.truncate(ENRICHMENT_LIMIT);

    let outcomes = join_all(repos.iter().map(|repo| enrich_one(gemini, repo))).await;

    let mut fallbacks = 0;
    for (repo, outcome) in repos.iter().zip(&outcomes) {
        if let Enrichment::Fallback { reason } = outcome {
            warn!("Error generating AI summary for {}: {reason}", repo.full_name);
            fallbacks += 1;
        }
    }
    debug!("Enriched {} results, {fallbacks} fell back", repos.len());

    repos
        .into_iter()
        .zip(outcomes)
        .map(|(mut repo, outcome)| {
            repo.ai_summary = Some(outcome.into_summary(repo.description.as_deref()));
            repo
        })
        .collect()
}

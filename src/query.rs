use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::SearchError;

/// Search mode as sent by the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SearchMode {
    #[default]
    #[serde(rename = "normal")]
    Plain,
    #[serde(rename = "ai")]
    Enriched,
}

/// Request body accepted by the search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Free-text search terms
    pub query: Option<String>,
    #[serde(default)]
    pub search_type: SearchMode,
    /// Restrict to a primary language
    pub language: Option<String>,
    /// Only repositories pushed within this many days
    pub activity_days: Option<u32>,
    pub min_stars: Option<u64>,
    /// 1-based result page
    pub page: Option<u32>,
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub mode: SearchMode,
    pub language: Option<String>,
    pub activity_window_days: Option<u32>,
    pub min_stars: Option<u64>,
    pub page: u32,
}

#[cfg(test)]
impl SearchRequest {
    pub fn plain(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode: SearchMode::Plain,
            language: None,
            activity_window_days: None,
            min_stars: None,
            page: 1,
        }
    }
}

impl TryFrom<SearchParams> for SearchRequest {
    type Error = SearchError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let query = params
            .query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .ok_or_else(|| SearchError::Validation("Search query is required".to_string()))?;

        let page = match params.page {
            None => 1,
            Some(0) => {
                return Err(SearchError::Validation(
                    "Page must be a positive integer".to_string(),
                ))
            }
            Some(page) => page,
        };

        let language = params
            .language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Ok(Self {
            query,
            mode: params.search_type,
            language,
            activity_window_days: params.activity_days,
            min_stars: params.min_stars,
            page,
        })
    }
}

/// Builds the GitHub search string: the query followed by language, star and
/// freshness qualifiers, in that order.
pub fn build_upstream_query(request: &SearchRequest, today: NaiveDate) -> String {
    let mut query = request.query.clone();

    if let Some(language) = &request.language {
        query.push_str(&format!(" language:{language}"));
    }
    if let Some(min_stars) = request.min_stars {
        query.push_str(&format!(" stars:>={min_stars}"));
    }
    if let Some(days) = request.activity_window_days {
        let cutoff = activity_cutoff(today, days);
        query.push_str(&format!(" pushed:>={}", cutoff.format("%Y-%m-%d")));
    }

    query
}

fn activity_cutoff(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

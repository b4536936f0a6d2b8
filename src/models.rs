use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::github::RepositoryItem;

pub const NO_LICENSE: &str = "No License";

/// One repository in a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryResult {
    /// GitHub repository id
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    /// Generated summary, only present for AI searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    pub html_url: String,
    #[serde(rename = "stars")]
    pub star_count: u64,
    #[serde(rename = "language")]
    pub primary_language: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "pushedAt")]
    pub last_pushed_at: Option<DateTime<Utc>>,
    #[serde(rename = "openIssues")]
    pub open_issue_count: u64,
    #[serde(rename = "forks")]
    pub fork_count: u64,
    #[serde(rename = "license")]
    pub license_name: String,
    pub topics: Vec<String>,
}

impl From<RepositoryItem> for RepositoryResult {
    fn from(item: RepositoryItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            full_name: item.full_name,
            description: item.description,
            ai_summary: None,
            html_url: item.html_url,
            star_count: item.stargazers_count,
            primary_language: item.language,
            updated_at: item.updated_at,
            last_pushed_at: item.pushed_at,
            open_issue_count: item.open_issues_count,
            fork_count: item.forks_count,
            license_name: item
                .license
                .and_then(|license| license.name)
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| NO_LICENSE.to_string()),
            topics: item.topics.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Results in GitHub relevance order
    pub repos: Vec<RepositoryResult>,
    /// Upstream estimate of all matches, not the length of `repos`
    pub total_count: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> RepositoryItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_license_defaults() {
        let result = RepositoryResult::from(item(json!({
            "id": 1,
            "name": "hello",
            "full_name": "octocat/hello",
            "description": null,
            "html_url": "https://github.com/octocat/hello",
            "stargazers_count": 3,
            "language": null,
            "open_issues_count": 0,
            "forks_count": 0,
            "license": null
        })));

        assert_eq!(result.license_name, NO_LICENSE);
        assert!(result.topics.is_empty());
        assert!(result.ai_summary.is_none());
    }

    #[test]
    fn test_license_name_is_kept_verbatim() {
        let result = RepositoryResult::from(item(json!({
            "id": 2,
            "name": "tokio",
            "full_name": "tokio-rs/tokio",
            "description": "A runtime",
            "html_url": "https://github.com/tokio-rs/tokio",
            "stargazers_count": 25000,
            "language": "Rust",
            "pushed_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-02T08:30:00Z",
            "open_issues_count": 300,
            "forks_count": 2000,
            "license": { "key": "mit", "name": "MIT License" },
            "topics": ["async", "runtime"]
        })));

        assert_eq!(result.license_name, "MIT License");
        assert_eq!(result.topics, vec!["async", "runtime"]);
        assert_eq!(result.star_count, 25000);
        assert!(result.last_pushed_at.is_some());
    }

    #[test]
    fn test_plain_result_serializes_without_ai_summary() {
        let mut result = RepositoryResult::from(item(json!({
            "id": 3,
            "name": "x",
            "full_name": "a/x",
            "html_url": "https://github.com/a/x",
            "stargazers_count": 1,
            "open_issues_count": 2,
            "forks_count": 3
        })));

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("aiSummary").is_none());
        assert_eq!(value["fullName"], "a/x");
        assert_eq!(value["stars"], 1);
        assert_eq!(value["openIssues"], 2);
        assert_eq!(value["forks"], 3);
        assert_eq!(value["license"], NO_LICENSE);

        result.ai_summary = Some("summary".into());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["aiSummary"], "summary");
    }
}

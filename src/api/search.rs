use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    api::types::AppState,
    error::SearchError,
    models::{ErrorBody, SearchResponse},
    query::{SearchParams, SearchRequest},
};

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            e if e.is_upstream() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let Self::UpstreamStatus { body, .. } = &self {
            debug!("Upstream response body: {body}");
        }
        if status.is_server_error() {
            error!("Search error: {self}");
        } else {
            warn!("Rejected search request: {self}");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Search GitHub repositories, optionally with AI-generated summaries
#[utoipa::path(
    post,
    path = "/search-repos",
    request_body = SearchParams,
    responses(
        (status = 200, description = "Repositories in GitHub relevance order", body = SearchResponse),
        (status = 400, description = "Missing or invalid search parameters", body = ErrorBody),
        (status = 500, description = "Server is missing an API key", body = ErrorBody),
        (status = 502, description = "GitHub search failed", body = ErrorBody)
    ),
    tag = "search"
)]
#[instrument(skip_all)]
pub async fn search_repos(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchParams>, JsonRejection>,
) -> Result<Json<SearchResponse>, SearchError> {
    let Json(params) = payload.map_err(|e| SearchError::Validation(e.body_text()))?;
    let request = SearchRequest::try_from(params)?;

    let response = state.search.handle(&request).await?;
    info!(
        "Returning {} of {} repositories",
        response.repos.len(),
        response.total_count
    );
    Ok(Json(response))
}

use utoipa::OpenApi;

use crate::{
    api::types::HealthResponse,
    models::{ErrorBody, RepositoryResult, SearchResponse},
    query::{SearchMode, SearchParams},
};

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::search::search_repos,
        crate::api::health::health
    ),
    components(
        schemas(
            SearchParams,
            SearchMode,
            SearchResponse,
            RepositoryResult,
            ErrorBody,
            HealthResponse
        )
    ),
    tags(
        (name = "search", description = "Repository search with optional AI summaries"),
        (name = "health", description = "Liveness probe")
    ),
    info(
        title = "Repository Health Search API",
        version = "1.0.0",
        description = "Proxy for GitHub repository search, optionally enriched with Gemini summaries",
    )
)]
pub struct ApiDoc;

pub mod health;
pub mod openapi;
pub mod search;
pub mod types;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health::health, openapi::ApiDoc, search::search_repos, types::AppState};

/// The browser front-end runs on another origin, so every route answers
/// pre-flight probes permissively.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_doc = ApiDoc::openapi();
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc))
        .route("/search-repos", post(search_repos))
        .route("/health", get(health))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, service::SearchService};
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn router(github: &MockServer, token: Option<&str>) -> Router {
        let config = Config {
            github_api_url: github.uri(),
            github_token: token.map(String::from),
            ..Config::default()
        };
        let search = SearchService::new(&config).unwrap();
        create_router(Arc::new(AppState { search }))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/search-repos")
            .header("content-type", "application/json")
            .header("origin", "https://app.example.com")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_preflight_is_permissive() {
        let github = MockServer::start().await;
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/search-repos")
            .header("origin", "https://app.example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type,apikey")
            .body(Body::empty())
            .unwrap();

        let response = router(&github, Some("t")).oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let allowed = headers["access-control-allow-headers"].to_str().unwrap();
        assert!(allowed.contains("apikey"));
        assert!(allowed.contains("x-client-info"));
    }

    #[tokio::test]
    async fn test_successful_search_envelope() {
        let github = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": 77,
                "items": [{
                    "id": 5,
                    "name": "serde",
                    "full_name": "serde-rs/serde",
                    "description": "Serialization framework",
                    "html_url": "https://github.com/serde-rs/serde",
                    "stargazers_count": 9000,
                    "language": "Rust",
                    "pushed_at": "2024-01-01T00:00:00Z",
                    "updated_at": "2024-01-02T00:00:00Z",
                    "open_issues_count": 10,
                    "forks_count": 700,
                    "license": { "name": "Apache License 2.0" },
                    "topics": ["serialization"]
                }]
            })))
            .mount(&github)
            .await;

        let response = router(&github, Some("t"))
            .oneshot(post_json(r#"{"query":"serde","searchType":"normal"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let body = json_body(response).await;
        assert_eq!(body["totalCount"], 77);
        assert_eq!(body["repos"][0]["fullName"], "serde-rs/serde");
        assert_eq!(body["repos"][0]["license"], "Apache License 2.0");
        assert!(body["repos"][0].get("aiSummary").is_none());
    }

    #[tokio::test]
    async fn test_blank_query_is_bad_request() {
        let github = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&github)
            .await;

        let response = router(&github, Some("t"))
            .oneshot(post_json(r#"{"query":"   ","searchType":"ai"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("query"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let github = MockServer::start().await;

        let response = router(&github, Some("t"))
            .oneshot(post_json(r#"{"query": "x", "page": -2}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_token_is_server_error() {
        let github = MockServer::start().await;

        let response = router(&github, None)
            .oneshot(post_json(r#"{"query":"x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["error"],
            "GitHub API key not configured"
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let github = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&github)
            .await;

        let response = router(&github, Some("t"))
            .oneshot(post_json(r#"{"query":"x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "GitHub API error: 503");
        assert!(body.get("repos").is_none());
    }

    #[tokio::test]
    async fn test_health() {
        let github = MockServer::start().await;
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = router(&github, None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }
}

//! HTTP Routes
//!
//! Configures the Axum router for one node: the peer cache path plus the
//! operational endpoints.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, serve_handler, stats_handler};
use super::HttpPool;

/// Creates the node router.
///
/// # Endpoints
/// - `GET <base_path>:group/:key` - Peer cache protocol (protobuf body)
/// - `GET /stats` - Per-group cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(pool: Arc<HttpPool>) -> Router {
    let cache_route = format!("{}/:group/:key", pool.base_path().trim_end_matches('/'));

    Router::new()
        .route(&cache_route, get(serve_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use prost::Message;
    use tower::util::ServiceExt;

    use super::*;
    use crate::group::{Loader, LoaderError, Registry};
    use crate::pb;

    struct TableLoader;

    #[async_trait::async_trait]
    impl Loader for TableLoader {
        async fn load(&self, key: &str) -> Result<Vec<u8>, LoaderError> {
            match key {
                "alice" => Ok(b"630".to_vec()),
                _ => Err(format!("{key} not found").into()),
            }
        }
    }

    fn create_test_app() -> Router {
        let registry = Arc::new(Registry::new());
        registry.new_group("scores", 1024, Box::new(TableLoader));
        let pool = Arc::new(HttpPool::new("http://localhost:3000", registry));
        create_router(pool)
    }

    #[tokio::test]
    async fn test_cache_endpoint_serves_protobuf() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_gcache/scores/alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/octet-stream"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let decoded = pb::Response::decode(body).unwrap();
        assert_eq!(decoded.value, b"630".to_vec());
    }

    #[tokio::test]
    async fn test_unknown_group_is_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_gcache/nope/alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_loader_failure_is_a_server_error() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_gcache/scores/ghost")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_malformed_path_is_not_found() {
        let app = create_test_app();

        // Missing the key segment; the route does not match.
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_gcache/scores")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_escaped_key_round_trips() {
        let app = create_test_app();

        // A key with an escaped space reaches the loader decoded, misses
        // the table and surfaces as a loader error, proving the decode.
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_gcache/scores/no%20such%20key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "no such key not found");
    }
}

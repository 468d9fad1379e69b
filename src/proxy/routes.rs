//! Proxy Routes
//!
//! Configures the Axum router: the proxy's own endpoints sit on explicit
//! routes, and the fallback route intercepts everything else.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, intercept_handler, stats_handler, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /stats` - Cache statistics and per-bucket usage
/// - `GET /healthz` - Health check endpoint
/// - fallback - The image-cache interceptor; non-image traffic is relayed
///   to the origin unchanged
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/stats", get(stats_handler))
        .route("/healthz", get(health_handler))
        .fallback(intercept_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::cache::TieredStore;
    use crate::upstream::{OutboundRequest, Upstream, UpstreamError, UpstreamResponse};

    /// Upstream that refuses every request.
    struct DownUpstream;

    #[async_trait]
    impl Upstream for DownUpstream {
        async fn send(&self, _req: OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
            Err(UpstreamError("connection refused".into()))
        }
    }

    fn create_test_app() -> Router {
        let state = AppState::new(
            TieredStore::new("v1"),
            Arc::new(DownUpstream),
            "/assets/fallback-image.svg",
        );
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
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
    async fn test_stats_route_shadows_interceptor() {
        // /stats must be answered locally even though the upstream is down
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
    async fn test_fallback_route_reaches_interceptor() {
        // With the origin down and no cached fallback image, an image
        // request terminates as 502
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/assets/photo.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}

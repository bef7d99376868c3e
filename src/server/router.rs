//! Axum router: maps URL paths to handlers.

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::handlers::{ice_history, ice_latest};
use super::state::{AppState, SharedState};

/// Build and return the proxy router.
///
/// Anything outside `/api` is served from `site_dir`.
pub fn build_router(state: AppState, site_dir: &Path) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/api/ice-latest", get(ice_latest))
        .route("/api/ice-history", get(ice_history))
        // Static site
        .fallback_service(ServeDir::new(site_dir))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::noaa::{Fetcher, Upstream};

    fn router(site_dir: &Path) -> Router {
        let fetcher = Fetcher::builder()
            .insecure_fallback(false)
            .build()
            .unwrap();
        // Port 9 (discard) refuses connections
        let upstream = Upstream::new("http://127.0.0.1:9/ice.json?time");
        build_router(AppState::new(fetcher, upstream), site_dir)
    }

    #[tokio::test]
    async fn test_unknown_path_falls_through_to_site() {
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("app.js"), "console.log('ice')").unwrap();

        let response = router(site.path())
            .oneshot(Request::get("/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router(site.path())
            .oneshot(Request::get("/nope.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_route_reports_bad_gateway() {
        let site = tempfile::tempdir().unwrap();
        let response = router(site.path())
            .oneshot(
                Request::get("/api/ice-history?days=400")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}

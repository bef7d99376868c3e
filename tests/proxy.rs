//! End-to-end tests: the proxy and the dashboard feed against a mock ERDDAP
//! server on an ephemeral port.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::RawQuery, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use icewatch::data::Lake;
use icewatch::noaa::{Fetcher, Upstream};
use icewatch::server::{build_router, AppState};
use icewatch::IceFeed;

/// Serves a three-row table. Rejects `orderByMax` the way some ERDDAP
/// deployments do, so callers must fall back to the full table.
async fn mock_erddap(RawQuery(query): RawQuery) -> impl IntoResponse {
    if query.as_deref().is_some_and(|q| q.contains("orderByMax")) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "unsupported"})),
        );
    }

    let at = |days: i64| {
        (Utc::now() - chrono::Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
    };
    (
        StatusCode::OK,
        Json(json!({
            "table": {
                "columnNames": ["time", "Superior", "Michigan", "Huron", "Erie", "Ontario", "GL_Total"],
                "columnTypes": ["String", "float", "float", "float", "float", "float", "float"],
                "rows": [
                    [at(200), 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                    [at(20), 20.0, 10.0, 15.0, 60.0, 5.0, 22.0],
                    [at(3), 35.5, 12.0, 18.0, 88.0, 4.0, 31.0]
                ]
            }
        })),
    )
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn fetcher() -> Fetcher {
    Fetcher::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

fn upstream_at(addr: SocketAddr) -> Upstream {
    Upstream::new(format!(
        "http://{}/erddap/ice.json?time,Superior,Michigan,Huron,Erie,Ontario,GL_Total",
        addr
    ))
}

async fn spawn_upstream() -> SocketAddr {
    spawn(Router::new().route("/erddap/ice.json", get(mock_erddap))).await
}

async fn spawn_proxy(upstream: Upstream, site_dir: &std::path::Path) -> SocketAddr {
    let state = AppState::new(fetcher(), upstream);
    spawn(build_router(state, site_dir)).await
}

#[tokio::test]
async fn latest_falls_back_to_full_table() {
    let site = tempfile::tempdir().unwrap();
    let upstream = spawn_upstream().await;
    let proxy = spawn_proxy(upstream_at(upstream), site.path()).await;

    let response = reqwest::get(format!("http://{}/api/ice-latest", proxy))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "application/json; charset=utf-8"
    );
    assert_eq!(response.headers()["cache-control"], "no-store");

    // Body is the upstream table, untouched
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["table"]["rows"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn history_is_trimmed_and_clamped() {
    let site = tempfile::tempdir().unwrap();
    let upstream = spawn_upstream().await;
    let proxy = spawn_proxy(upstream_at(upstream), site.path()).await;

    // 5 is below the minimum and becomes 14
    let response = reqwest::get(format!("http://{}/api/ice-history?days=5", proxy))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["cache-control"], "no-store");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["days"], 14);
    assert!(body["generated_at"].as_str().unwrap().ends_with('Z'));
    let rows = body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Erie"], 88.0);
    assert_eq!(rows[0]["GL_Total"], 31.0);

    let response = reqwest::get(format!("http://{}/api/ice-history", proxy))
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["days"], 90);
    assert_eq!(body["rows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unreachable_upstream_is_a_bad_gateway() {
    let site = tempfile::tempdir().unwrap();
    let upstream = dead_addr().await;
    let proxy = spawn_proxy(upstream_at(upstream), site.path()).await;

    for path in ["/api/ice-latest", "/api/ice-history?days=30"] {
        let response = reqwest::get(format!("http://{}{}", proxy, path))
            .await
            .unwrap();
        assert_eq!(response.status(), 502);
        assert_eq!(response.headers()["cache-control"], "no-store");

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Unable to fetch NOAA data.");
        // One detail per endpoint tried
        assert_eq!(body["details"].as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn static_site_is_served() {
    let site = tempfile::tempdir().unwrap();
    std::fs::write(site.path().join("index.html"), "<h1>ice</h1>").unwrap();
    let upstream = dead_addr().await;
    let proxy = spawn_proxy(upstream_at(upstream), site.path()).await;

    let response = reqwest::get(format!("http://{}/", proxy)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "<h1>ice</h1>");

    let response = reqwest::get(format!("http://{}/missing.css", proxy))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn feed_prefers_the_proxy() {
    let site = tempfile::tempdir().unwrap();
    let upstream = spawn_upstream().await;
    let proxy = spawn_proxy(upstream_at(upstream), site.path()).await;

    let feed =
        IceFeed::new(fetcher(), upstream_at(upstream)).with_proxy(format!("http://{}/", proxy));
    let snapshot = feed.fetch_snapshot(30).await.unwrap();

    assert_eq!(snapshot.endpoint, format!("http://{}/api/ice-latest", proxy));
    assert_eq!(snapshot.latest.get(Lake::Erie), Some(88.0));
    assert!(snapshot.history_error.is_none());
    assert_eq!(snapshot.history.len(), 2);
}

#[tokio::test]
async fn feed_falls_back_when_proxy_is_down() {
    let upstream = spawn_upstream().await;
    let proxy = dead_addr().await;

    let feed =
        IceFeed::new(fetcher(), upstream_at(upstream)).with_proxy(format!("http://{}", proxy));
    let snapshot = feed.fetch_snapshot(30).await.unwrap();

    // orderByMax is rejected, so the full table answers
    assert_eq!(snapshot.endpoint, upstream_at(upstream).base());
    assert_eq!(snapshot.latest.get(Lake::Superior), Some(35.5));
    assert_eq!(snapshot.history.len(), 2);
}

#[tokio::test]
async fn feed_reports_total_failure() {
    let feed = IceFeed::new(fetcher(), upstream_at(dead_addr().await));
    let err = feed.fetch_snapshot(30).await.unwrap_err();
    assert_eq!(err.details().len(), 2);
}

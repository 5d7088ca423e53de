use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sagemcom_exporter::{AppState, Config, MetricsRegistry, Snapshot, create_router, names};
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        router_host: "10.0.0.1".to_string(),
        router_username: "admin".to_string(),
        router_password: "secret".to_string(),
        collection_interval_secs: 60,
        server_port: 8000,
        speedtest_interval_secs: 3600,
        ping_target: "google.com".to_string(),
    }
}

fn make_state(metrics: MetricsRegistry) -> Arc<AppState> {
    Arc::new(AppState {
        config: test_config(),
        metrics,
    })
}

fn sample_snapshot() -> Snapshot {
    let mut builder = Snapshot::builder();
    builder
        .gauge(names::CONNECTED_DEVICES, "DHCP clients by connection status")
        .set_labeled(
            vec![("status".to_string(), "online".to_string())],
            2.0,
        );
    builder
        .gauge(names::SPEEDTEST_DOWNLOAD, "Download speed in Mbps")
        .set(50.0);
    builder
        .gauge(
            names::LAST_COLLECTION_SUCCESS,
            "Whether the most recent collection cycle succeeded",
        )
        .set(1.0);
    builder.build()
}

async fn body_text(resp: axum::response::Response) -> String {
    String::from_utf8(
        resp.into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap()
}

// --- /metrics endpoint ---

#[tokio::test]
async fn metrics_returns_200_with_openmetrics_content_type() {
    let state = make_state(MetricsRegistry::new());
    let app = create_router(state);

    let resp = app
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(
        ct.contains("openmetrics-text"),
        "Expected OpenMetrics content-type, got: {ct}"
    );
}

#[tokio::test]
async fn metrics_empty_registry_renders_parseable_output() {
    let state = make_state(MetricsRegistry::new());
    let app = create_router(state);

    let resp = app
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.ends_with("# EOF\n"));
}

#[tokio::test]
async fn metrics_contains_snapshot_data_after_replace() {
    let metrics = MetricsRegistry::new();
    metrics.replace(sample_snapshot());
    let state = make_state(metrics);

    let app = create_router(state);
    let resp = app
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    let body = body_text(resp).await;
    assert!(body.contains("sagemcom_connected_devices{status=\"online\"} 2.0"));
    assert!(body.contains("sagemcom_speedtest_download_mbps 50.0"));
    assert!(body.contains("sagemcom_last_collection_success 1.0"));
}

#[tokio::test]
async fn metrics_never_errors_after_failed_collection() {
    let metrics = MetricsRegistry::new();
    metrics.replace(sample_snapshot());
    metrics.mark_cycle_failed();
    let state = make_state(metrics);

    let app = create_router(state);
    let resp = app
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    // Failure is visible in the metrics, never as a 5xx
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("sagemcom_connected_devices{status=\"online\"} 2.0"));
    assert!(body.contains("sagemcom_last_collection_success 0.0"));
}

#[tokio::test]
async fn metrics_has_no_duplicate_series() {
    let metrics = MetricsRegistry::new();
    metrics.replace(sample_snapshot());
    let state = make_state(metrics);

    let app = create_router(state);
    let resp = app
        .oneshot(Request::get("/metrics").body(String::new()).unwrap())
        .await
        .unwrap();

    let body = body_text(resp).await;
    let mut series: Vec<&str> = body
        .lines()
        .filter(|l| !l.starts_with('#') && !l.is_empty())
        .map(|l| l.rsplit_once(' ').map_or(l, |(series, _)| series))
        .collect();
    let total = series.len();
    series.sort_unstable();
    series.dedup();
    assert_eq!(series.len(), total, "duplicate series in exposition output");
}

// --- /health endpoint ---

#[tokio::test]
async fn health_returns_200_before_first_cycle() {
    let state = make_state(MetricsRegistry::new());
    let app = create_router(state);

    let resp = app
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(health["status"], "ok");
    assert!(health["last_collection_success"].is_null());
}

#[tokio::test]
async fn health_reports_last_collection_outcome() {
    let metrics = MetricsRegistry::new();
    metrics.replace(sample_snapshot());
    let state = make_state(metrics.clone());
    let app = create_router(state);

    let resp = app
        .clone()
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();
    let health: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(health["last_collection_success"], true);

    metrics.mark_cycle_failed();
    let resp = app
        .oneshot(Request::get("/health").body(String::new()).unwrap())
        .await
        .unwrap();
    let health: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(health["last_collection_success"], false);
}

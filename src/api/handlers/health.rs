use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;
use crate::metrics::names;

/// Health check endpoint response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// `None` until the first collection cycle has finished
    pub last_collection_success: Option<bool>,
}

/// GET /health
///
/// Reports process liveness and the outcome of the most recent collection
/// cycle. Always 200: a failing router degrades metrics, not the exporter.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.metrics.current();
    let last_collection_success = snapshot
        .family(names::LAST_COLLECTION_SUCCESS)
        .and_then(|f| f.samples.first())
        .map(|s| s.value > 0.0);

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        last_collection_success,
    };

    (StatusCode::OK, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::metrics::MetricsRegistry;
    use axum::extract::State;

    fn make_state(metrics: MetricsRegistry) -> Arc<AppState> {
        Arc::new(AppState {
            config: Config {
                router_host: "10.0.0.1".to_string(),
                router_username: "admin".to_string(),
                router_password: "secret".to_string(),
                collection_interval_secs: 300,
                server_port: 8000,
                speedtest_interval_secs: 3600,
                ping_target: "google.com".to_string(),
            },
            metrics,
        })
    }

    #[tokio::test]
    async fn test_health_check_before_first_cycle() {
        let state = make_state(MetricsRegistry::new());
        let response = health_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_failed_collection() {
        let registry = MetricsRegistry::new();
        registry.mark_cycle_failed();
        let state = make_state(registry.clone());

        let snapshot = state.metrics.current();
        let success = snapshot
            .family(names::LAST_COLLECTION_SUCCESS)
            .and_then(|f| f.samples.first())
            .map(|s| s.value > 0.0);
        assert_eq!(success, Some(false));
    }
}

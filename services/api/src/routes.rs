use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use realty::diagnostics::{self, DiagnosticsReport};
use realty::store::DocumentStore;
use realty::{realty_router, LeadIntake, PropertyCatalog};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn with_operational_routes<S>(
    catalog: Arc<PropertyCatalog<S>>,
    intake: Arc<LeadIntake<S>>,
) -> Router
where
    S: DocumentStore + 'static,
{
    realty_router(catalog, intake)
        .route("/test", get(diagnostics_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn diagnostics_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<DiagnosticsReport> {
    Json(diagnostics::probe(state.store.as_ref(), &state.store_config))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use realty::config::StoreConfig;
    use realty::listings::DEFAULT_MAX_PAGE_SIZE;
    use realty::store::{InMemoryDocumentStore, StoreBackend};
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(backend: StoreBackend, store_config: StoreConfig, ready: bool) -> Router {
        let store = Arc::new(backend);
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            store: store.clone(),
            store_config: Arc::new(store_config),
        };
        let catalog = Arc::new(PropertyCatalog::new(store.clone(), DEFAULT_MAX_PAGE_SIZE));
        let intake = Arc::new(LeadIntake::new(store));
        with_operational_routes(catalog, intake).layer(Extension(state))
    }

    fn memory_app() -> Router {
        app(
            StoreBackend::Memory(InMemoryDocumentStore::new("realty")),
            StoreConfig {
                database_url: Some("memory://realty".to_string()),
                database_name: Some("realty".to_string()),
            },
            true,
        )
    }

    async fn fetch(router: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn diagnostics_reports_a_reachable_store() {
        let (status, body) = fetch(memory_app(), "/test").await;
        assert_eq!(status, StatusCode::OK);

        let report: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(report["backend"], "running");
        assert_eq!(report["store_configured"], true);
        assert_eq!(report["store_reachable"], true);
        assert_eq!(report["database_url_set"], true);
        assert!(report["collections"].is_array());
    }

    #[tokio::test]
    async fn diagnostics_reports_missing_store_without_failing() {
        let router = app(StoreBackend::Unconfigured, StoreConfig::default(), true);
        let (status, body) = fetch(router, "/test").await;

        assert_eq!(status, StatusCode::OK);
        let report: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(report["process_reachable"], true);
        assert_eq!(report["store_configured"], false);
        assert_eq!(report["store_reachable"], false);
        assert_eq!(report["database_url_set"], false);
    }

    #[tokio::test]
    async fn readiness_tracks_the_flag() {
        let (status, _) = fetch(memory_app(), "/ready").await;
        assert_eq!(status, StatusCode::OK);

        let not_ready = app(StoreBackend::Unconfigured, StoreConfig::default(), false);
        let (status, body) = fetch(not_ready, "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["status"], "initializing");
    }

    #[tokio::test]
    async fn health_and_root_answer() {
        let (status, body) = fetch(memory_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["status"], "ok");

        let (status, body) = fetch(memory_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert!(payload["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn metrics_render_as_prometheus_text() {
        let router = memory_app();
        let response = router
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}

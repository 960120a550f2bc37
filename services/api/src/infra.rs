use metrics_exporter_prometheus::PrometheusHandle;
use realty::config::StoreConfig;
use realty::store::StoreBackend;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Process-level state shared with the operational routes.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: Arc<StoreBackend>,
    pub(crate) store_config: Arc<StoreConfig>,
}

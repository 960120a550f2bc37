use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use realty::catalog::PropertyCatalogImporter;
use realty::config::AppConfig;
use realty::error::AppError;
use realty::store::DocumentStore;
use realty::telemetry;
use realty::{LeadIntake, PropertyCatalog};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = Arc::new(config.store.open()?);
    if store.is_configured() {
        info!(store = store.name(), "document store opened");
    } else {
        warn!("DATABASE_URL is not set; listing and lead routes will answer 500");
    }

    let catalog = Arc::new(PropertyCatalog::new(
        store.clone(),
        config.browse.max_page_size,
    ));
    if let Some(path) = args.catalog.take() {
        let properties = PropertyCatalogImporter::from_path(&path)?.into_properties()?;
        let ids = catalog.seed(properties)?;
        info!(path = %path.display(), seeded = ids.len(), "property catalog loaded");
    }
    let intake = Arc::new(LeadIntake::new(store.clone()));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        store,
        store_config: Arc::new(config.store.clone()),
    };

    let app = with_operational_routes(catalog, intake)
        .layer(Extension(app_state))
        .layer(cors_layer())
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "realty api ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("realty api stopped");
    Ok(())
}

/// Any origin, method and header. Credentials stay disabled since they cannot be paired with
/// a wildcard origin.
pub(crate) fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

//! Connectivity report behind `GET /test`. Never fails; problems become status text.

use serde::Serialize;

use crate::config::StoreConfig;
use crate::store::{DocumentStore, StoreError};

pub const MAX_REPORTED_COLLECTIONS: usize = 10;
const STATUS_DETAIL_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub backend: &'static str,
    pub process_reachable: bool,
    pub store_configured: bool,
    pub store_reachable: bool,
    pub database: String,
    pub database_name: Option<String>,
    pub database_url_set: bool,
    pub database_name_set: bool,
    pub connection_status: &'static str,
    pub collections: Vec<String>,
}

pub fn probe<S>(store: &S, config: &StoreConfig) -> DiagnosticsReport
where
    S: DocumentStore + ?Sized,
{
    let mut report = DiagnosticsReport {
        backend: "running",
        process_reachable: true,
        store_configured: store.is_configured(),
        store_reachable: false,
        database: "not available".to_string(),
        database_name: None,
        database_url_set: config.database_url.is_some(),
        database_name_set: config.database_name.is_some(),
        connection_status: "not connected",
        collections: Vec::new(),
    };

    if !report.store_configured {
        report.database = "available but not initialized".to_string();
        return report;
    }

    report.database_name = Some(store.name().to_string());

    match store.list_collection_names() {
        Ok(mut names) => {
            names.truncate(MAX_REPORTED_COLLECTIONS);
            report.collections = names;
            report.store_reachable = true;
            report.connection_status = "connected";
            report.database = "connected & working".to_string();
        }
        Err(StoreError::NotConfigured) => {
            report.store_configured = false;
            report.database = "available but not initialized".to_string();
        }
        Err(err) => {
            report.database = format!("configured but error: {}", truncate(&err.to_string()));
        }
    }

    report
}

fn truncate(detail: &str) -> String {
    detail.chars().take(STATUS_DETAIL_LIMIT).collect()
}

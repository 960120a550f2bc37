use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{de, Deserialize, Deserializer};
use serde_json::json;

use crate::error::AppError;
use crate::leads::{LeadIntake, LeadReceipt};
use crate::listings::{PropertyCatalog, PropertyPage};
use crate::query::PropertyQuery;
use crate::schema::LeadSubmission;
use crate::store::DocumentStore;

/// Shared handles for the public routes.
pub struct RealtyState<S> {
    pub catalog: Arc<PropertyCatalog<S>>,
    pub intake: Arc<LeadIntake<S>>,
}

impl<S> Clone for RealtyState<S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            intake: Arc::clone(&self.intake),
        }
    }
}

/// Query string accepted by `GET /api/properties`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyListParams {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_integer")]
    pub min_price: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_integer")]
    pub max_price: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_integer")]
    pub limit: Option<i64>,
}

impl PropertyListParams {
    fn into_parts(self) -> (PropertyQuery, Option<i64>) {
        let query = PropertyQuery {
            location: self.location,
            property_type: self.property_type,
            min_price: self.min_price,
            max_price: self.max_price,
        };
        (query, self.limit)
    }
}

/// Router builder exposing the listing and lead endpoints.
pub fn realty_router<S>(catalog: Arc<PropertyCatalog<S>>, intake: Arc<LeadIntake<S>>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new()
        .route("/", get(root_handler))
        .route("/api/properties", get(list_properties_handler::<S>))
        .route("/api/inquiry", post(create_inquiry_handler::<S>))
        .with_state(RealtyState { catalog, intake })
}

pub(crate) async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hyderabad Realty Consultancy API is running" }))
}

pub(crate) async fn list_properties_handler<S>(
    State(state): State<RealtyState<S>>,
    params: Result<Query<PropertyListParams>, QueryRejection>,
) -> Result<Json<PropertyPage>, AppError>
where
    S: DocumentStore + 'static,
{
    let Query(params) = params.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let (query, limit) = params.into_parts();
    let page = state.catalog.browse(&query, limit)?;
    Ok(Json(page))
}

pub(crate) async fn create_inquiry_handler<S>(
    State(state): State<RealtyState<S>>,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<Json<LeadReceipt>, AppError>
where
    S: DocumentStore + 'static,
{
    let Json(submission) =
        payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let receipt = state.intake.submit(submission)?;
    Ok(Json(receipt))
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn deserialize_optional_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    empty_string_as_none(deserializer)?
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|err| de::Error::custom(format!("'{raw}' is not an integer ({err})")))
        })
        .transpose()
}

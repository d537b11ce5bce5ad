//! # API Handlers
//!
//! Axum handlers for `/api/animals`.

use crate::animals::StoreError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use zk_core::{Animal, Criteria, NOT_PROPERLY_FORMATTED};

/// Body sent with a 500 when the document rewrite fails.
pub const PERSIST_FAILED: &str = "Failed to persist animal.";

/// Failure outcomes of the animal routes.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with a plain-text message.
    BadRequest(&'static str),
    /// 404 with no body.
    NotFound,
    /// 500 with a plain-text message.
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(_) => ApiError::BadRequest(NOT_PROPERLY_FORMATTED),
            StoreError::Persistence(_) => ApiError::Internal(PERSIST_FAILED),
        }
    }
}

// =============================================================================
// Animals
// =============================================================================

pub async fn list_animals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Animal>> {
    tracing::debug!("GET /api/animals {:?}", params);
    let criteria = Criteria::from_pairs(params);
    let animals = state.animals.query(&criteria).await;
    Json(animals)
}

pub async fn get_animal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Animal>, ApiError> {
    state
        .animals
        .get(&id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// The body is read as JSON whatever the content type; anything that does
/// not parse is treated like a badly shaped animal.
pub async fn create_animal(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Animal>, ApiError> {
    let candidate: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Rejected animal: body is not JSON: {}", e);
        ApiError::BadRequest(NOT_PROPERLY_FORMATTED)
    })?;
    let animal = state.animals.create(candidate).await?;
    Ok(Json(animal))
}

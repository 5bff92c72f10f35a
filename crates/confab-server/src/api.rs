//! Connection-details handlers.
//!
//! Two equivalent entry styles (query parameters and a JSON body) with
//! identical defaulting. Configuration and signing failures both collapse
//! into one generic service-unavailable payload; which credential was
//! missing is logged server-side, never returned.

use crate::AppState;
use axum::{
    extract::{Extension, Json, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use confab_types::ConnectionDetails;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Room/participant selection, shared by both entry styles.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectionDetailsParams {
    #[serde(rename = "roomName")]
    pub room_name: Option<String>,
    #[serde(rename = "participantName")]
    pub participant_name: Option<String>,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to generate connection details")]
    GrantUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Handler for `GET /api/connection-details`.
pub async fn get_connection_details_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ConnectionDetailsParams>,
) -> Result<Json<ConnectionDetails>, ApiError> {
    issue(&state, &params)
}

/// Handler for `POST /api/connection-details`.
pub async fn post_connection_details_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(params): Json<ConnectionDetailsParams>,
) -> Result<Json<ConnectionDetails>, ApiError> {
    issue(&state, &params)
}

fn issue(
    state: &AppState,
    params: &ConnectionDetailsParams,
) -> Result<Json<ConnectionDetails>, ApiError> {
    state
        .grants
        .issue(params.room_name.as_deref(), params.participant_name.as_deref())
        .map(Json)
        .map_err(|e| {
            tracing::error!("failed to generate connection details: {}", e);
            ApiError::GrantUnavailable
        })
}

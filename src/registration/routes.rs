//! REST endpoints for submitting registrations and checking their state.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;

use super::desk::RegistrationDesk;
use super::model::PatientRecord;
use crate::records::{SubmissionOutcome, SubmissionResponse};

/// Shared state for registration routes.
#[derive(Clone)]
pub struct RegistrationRouteState {
    pub desk: Arc<RegistrationDesk>,
}

/// Relay body plus the id the caller can poll, when one was kept.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    registration_id: Option<Uuid>,
    #[serde(flatten)]
    result: SubmissionResponse,
}

/// POST /api/registrations
///
/// Opens a registration for the posted record and submits it. The body is
/// the relay JSON; the status code mirrors the outcome.
async fn create_registration(
    State(state): State<RegistrationRouteState>,
    Json(record): Json<PatientRecord>,
) -> impl IntoResponse {
    let (registration_id, outcome) = state.desk.register(record).await;
    let status = match outcome {
        SubmissionOutcome::Submitted { .. } => StatusCode::OK,
        SubmissionOutcome::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::SubmissionFailed { .. } => StatusCode::BAD_GATEWAY,
    };
    let reply = RegistrationReply {
        registration_id,
        result: outcome.to_response(),
    };
    (status, Json(reply))
}

/// GET /api/registrations/{id}
///
/// Returns the lifecycle state of a registration, or 404.
async fn get_registration(
    State(state): State<RegistrationRouteState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Invalid registration ID"})),
        )
            .into_response();
    };
    match state.desk.status(id).await {
        Some(registration) => Json(registration).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Registration not found"})),
        )
            .into_response(),
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "patient-intake"
    }))
}

/// Build the registration REST routes.
pub fn registration_routes(state: RegistrationRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/registrations", post(create_registration))
        .route("/api/registrations/{id}", get(get_registration))
        .with_state(state)
}

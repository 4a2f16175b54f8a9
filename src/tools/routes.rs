//! REST endpoints exposing the dialogue tools.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use super::registry::ToolRegistry;
use crate::error::{Error, ToolError};

/// Shared state for tool routes.
#[derive(Clone)]
pub struct ToolRouteState {
    pub registry: Arc<ToolRegistry>,
}

/// GET /api/tools
async fn list_tools(State(state): State<ToolRouteState>) -> impl IntoResponse {
    Json(state.registry.tool_definitions().await)
}

/// POST /api/tools/{name}
///
/// Runs a tool with the posted JSON as its parameters. Returns the tool's
/// result, or an `error` body with a status matching the failure.
async fn call_tool(
    State(state): State<ToolRouteState>,
    Path(name): Path<String>,
    Json(params): Json<serde_json::Value>,
) -> impl IntoResponse {
    match state.registry.execute(&name, params).await {
        Ok(output) => Json(serde_json::json!({
            "result": output.result,
            "durationMs": output.duration.as_millis() as u64,
        }))
        .into_response(),
        Err(e) => {
            let status = match &e {
                Error::Tool(ToolError::NotFound { .. }) => StatusCode::NOT_FOUND,
                Error::Tool(ToolError::InvalidParameters { .. }) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::warn!(tool = %name, error = %e, "Tool call failed");
            (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
        }
    }
}

/// Build the tool REST routes.
pub fn tool_routes(state: ToolRouteState) -> Router {
    Router::new()
        .route("/api/tools", get(list_tools))
        .route("/api/tools/{name}", post(call_tool))
        .with_state(state)
}

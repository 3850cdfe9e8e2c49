use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Body of the root and greeting endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET / — identifies the service; doubles as a liveness check.
pub async fn root(State(state): State<AppState>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: state.config.service_name.clone(),
    })
}

/// GET /api/hello
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello from the backend API!".to_string(),
    })
}

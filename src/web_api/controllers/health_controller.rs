use axum::{Json, extract::State, http::StatusCode};

use crate::{app_state::SharedState, health_response::HealthResponse};

pub struct HealthController {}

impl HealthController {
    pub async fn get(State(state): State<SharedState>) -> Result<Json<HealthResponse>, (StatusCode, String)> {
        state.data_context.revision()
            .map(|revision| Json(HealthResponse { status: "ok", revision }))
            .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
    }
}

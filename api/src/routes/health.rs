use crate::AppState;
use axum::{Json, extract::State};
use chrono::Utc;

/// GET /health
/// Response: 200 OK with JSON
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
      "status": "healthy",
      "timestamp": Utc::now().timestamp(),
      "remoteStore": if state.remote_configured { "configured" } else { "disabled" },
    }))
}

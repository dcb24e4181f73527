use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::{database, error::ApiError, AppState};

/// GET /api/health - Health check including a database ping
pub async fn health_check(State(app_state): State<AppState>) -> Result<Json<Value>, ApiError> {
    database::health_check(&app_state.db_pool).await?;

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}

/// GET /api/health/live - Process liveness, no dependencies touched
pub async fn liveness_check() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}

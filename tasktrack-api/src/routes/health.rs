/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// Returns 200 with `"status": "healthy"` while the database answers, and
/// 503 with `"status": "degraded"` when it doesn't, so load balancers can
/// route on the status code alone.
use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status: "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status: "connected" or "disconnected"
    pub database: String,
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = sqlx::query("SELECT 1").fetch_one(&state.db).await.is_ok();

    let (status_code, status, database) = if database_ok {
        (StatusCode::OK, "healthy", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        }),
    )
}

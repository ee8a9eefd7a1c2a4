use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthData {
    /// `healthy` or `degraded`
    pub status: String,
    /// `healthy` or `unhealthy`
    pub database: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status; degraded when the database is unreachable", body = HealthData),
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let (status, database) = match state.orm.ping().await {
        Ok(()) => ("healthy", "healthy"),
        Err(err) => {
            tracing::warn!(error = %err, "database ping failed");
            ("degraded", "unhealthy")
        }
    };

    Json(HealthData {
        status: status.to_string(),
        database: database.to_string(),
        version: VERSION.to_string(),
    })
}

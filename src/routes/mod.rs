use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

pub mod doc;
pub mod health;
pub mod metrics;
pub mod params;
pub mod products;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Welcome {
    pub message: String,
    pub status: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome document", body = Welcome),
    ),
    tag = "Health"
)]
pub async fn root() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to Inventory API".to_string(),
        status: "running".to_string(),
        version: health::VERSION.to_string(),
    })
}

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::metrics))
        .merge(products::router())
}

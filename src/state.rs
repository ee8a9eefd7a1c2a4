use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{metrics::Metrics, services::product_service::ProductPolicy};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub policy: ProductPolicy,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, policy: ProductPolicy) -> Self {
        Self {
            orm,
            policy,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

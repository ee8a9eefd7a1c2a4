#![allow(dead_code)]

use std::ops::Deref;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use inventory_api::{
    app::build_router, db, dto::products::CreateProductRequest, models::Product,
    services::product_service::{self, ProductPolicy}, state::AppState,
};
use sea_orm::ConnectionTrait;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

/// Tests sharing one external database take turns; in-memory SQLite needs no lock.
static EXTERNAL_DB: Mutex<()> = Mutex::const_new(());

/// Application state over a fresh `products` table.
///
/// With `TEST_DATABASE_URL` set (e.g. a PostgreSQL URL) the table lives in that
/// database and is recreated for every test; otherwise each test gets its own
/// `sqlite::memory:` database.
pub struct TestDb {
    pub state: AppState,
    _serial: Option<MutexGuard<'static, ()>>,
}

impl Deref for TestDb {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

pub async fn setup_state() -> TestDb {
    setup_state_with(ProductPolicy::default()).await
}

pub async fn setup_state_with(policy: ProductPolicy) -> TestDb {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        let orm = db::init("sqlite::memory:", &policy)
            .await
            .expect("in-memory database");
        return TestDb {
            state: AppState::new(orm, policy),
            _serial: None,
        };
    };

    let serial = EXTERNAL_DB.lock().await;
    let url = inventory_api::config::normalize_database_url(&url).expect("TEST_DATABASE_URL");
    let orm = db::create_orm_conn(&url).await.expect("test database");
    orm.execute_unprepared("DROP TABLE IF EXISTS products")
        .await
        .expect("reset products table");
    db::create_schema(&orm, &policy).await.expect("create schema");
    TestDb {
        state: AppState::new(orm, policy),
        _serial: Some(serial),
    }
}

/// The returned `TestDb` must stay alive for as long as the router is used.
pub async fn setup_app() -> (Router, TestDb) {
    let db = setup_state().await;
    (build_router(db.state.clone()), db)
}

pub async fn seed(state: &AppState, name: &str, quantity: i32, price: f64) -> Product {
    product_service::create_product(
        &state.orm,
        &state.policy,
        CreateProductRequest {
            name: name.to_string(),
            description: None,
            quantity,
            price,
        },
    )
    .await
    .expect("seed product")
}

/// Sends one request through the router and decodes the JSON body (`Null` when empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::AppResult,
    metrics::ProductEvent,
    models::Product,
    response::{ErrorBody, Page},
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/products/",
    params(ProductQuery),
    responses(
        (status = 200, description = "One page of products", body = Page<Product>),
        (status = 400, description = "Invalid query", body = ErrorBody),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> AppResult<Json<Page<Product>>> {
    let Query(query) = query?;
    let page = product_service::list_products(&state.orm, query).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = Product),
        (status = 404, description = "Product not found", body = ErrorBody),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Product>> {
    let Path(id) = id?;
    let product = product_service::get_product(&state.orm, id).await?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/products/",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation failed or name already exists", body = ErrorBody),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let Json(payload) = payload?;
    let product = product_service::create_product(&state.orm, &state.policy, payload).await?;
    state.metrics.record_product(ProductEvent::Created);
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> AppResult<Json<Product>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let product = product_service::update_product(&state.orm, &state.policy, id, payload).await?;
    state.metrics.record_product(ProductEvent::Updated);
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Deleted product"),
        (status = 404, description = "Product not found", body = ErrorBody),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    product_service::delete_product(&state.orm, id).await?;
    state.metrics.record_product(ProductEvent::Deleted);
    Ok(StatusCode::NO_CONTENT)
}

use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    models::Product,
    response::{ErrorBody, Page},
    routes::{
        self, health, metrics,
        params::{ProductSortBy, SortOrder},
        products as product_routes,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        description = "Product inventory tracking service"
    ),
    paths(
        routes::root,
        health::health_check,
        metrics::metrics,
        product_routes::list_products,
        product_routes::create_product,
        product_routes::get_product,
        product_routes::update_product,
        product_routes::delete_product,
    ),
    components(
        schemas(
            Product,
            CreateProductRequest,
            UpdateProductRequest,
            ProductSortBy,
            SortOrder,
            ErrorBody,
            Page<Product>,
            health::HealthData,
            routes::Welcome,
        )
    ),
    tags(
        (name = "Health", description = "Liveness, metrics and service info"),
        (name = "Products", description = "Product CRUD endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

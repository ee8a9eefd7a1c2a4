use inventory_api::{
    config::AppConfig,
    db,
    dto::products::CreateProductRequest,
    error::AppError,
    services::product_service::{self, ProductPolicy},
};

const SAMPLE_PRODUCTS: &[(&str, &str, i32, f64)] = &[
    ("Laptop", "14-inch ultrabook", 10, 999.99),
    ("Mechanical Keyboard", "Tenkeyless, brown switches", 25, 89.5),
    ("Wireless Mouse", "Ergonomic, 2.4 GHz", 40, 24.99),
    ("USB-C Hub", "7-in-1 with HDMI", 0, 39.0),
    ("27\" Monitor", "1440p IPS panel", 6, 329.0),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = db::init(&config.database_url, &config.product_policy()).await?;
    // Names must be unique so reruns skip rows that already exist.
    let policy = ProductPolicy {
        enforce_unique_names: true,
    };

    for (name, description, quantity, price) in SAMPLE_PRODUCTS {
        let payload = CreateProductRequest {
            name: name.to_string(),
            description: Some(description.to_string()),
            quantity: *quantity,
            price: *price,
        };
        match product_service::create_product(&orm, &policy, payload).await {
            Ok(product) => println!("Seeded product {} (id={})", product.name, product.id),
            Err(AppError::Conflict(_)) => println!("Product {name} already present"),
            Err(err) => return Err(anyhow::anyhow!(err)),
        }
    }

    let total = product_service::count_products(&orm).await?;
    println!("Seed completed. {total} products in inventory");
    Ok(())
}

use inventory_api::{config::AppConfig, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    db::init(&config.database_url, &config.product_policy()).await?;
    println!("Schema ready");
    Ok(())
}

use anyhow::{Context, Result};
use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::{
    entity::{Products, products::Column},
    services::product_service::ProductPolicy,
};

pub const NAME_KEY_INDEX: &str = "idx_products_name_key";

/// Create a SeaORM connection pool.
///
/// Every connection to `sqlite::memory:` opens a fresh database, so in-memory
/// pools are pinned to a single connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    tracing::debug!(backend = ?conn.get_database_backend(), "database connected");
    Ok(conn)
}

/// Creates the `products` table when it does not exist yet, and creates or
/// drops the unique index on `name_key` to match the naming policy.
pub async fn create_schema(conn: &DatabaseConnection, policy: &ProductPolicy) -> Result<()> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    let mut table = schema.create_table_from_entity(Products);
    table.if_not_exists();
    conn.execute(backend.build(&table)).await?;

    if policy.enforce_unique_names {
        let index = Index::create()
            .name(NAME_KEY_INDEX)
            .table(Products)
            .col(Column::NameKey)
            .unique()
            .if_not_exists()
            .to_owned();
        conn.execute(backend.build(&index))
            .await
            .context("cannot enforce unique product names; existing rows share a name")?;
    } else {
        let index = Index::drop()
            .name(NAME_KEY_INDEX)
            .table(Products)
            .if_exists()
            .to_owned();
        conn.execute(backend.build(&index)).await?;
    }
    Ok(())
}

/// Connects and makes sure the schema exists.
pub async fn init(database_url: &str, policy: &ProductPolicy) -> Result<DatabaseConnection> {
    let conn = create_orm_conn(database_url).await?;
    create_schema(&conn, policy).await?;
    Ok(conn)
}

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
    TransactionTrait,
};

use crate::{
    dto::products::{CreateProductRequest, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products},
    error::{AppError, AppResult},
    models::Product,
    response::Page,
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    validation::fold_name,
};

/// Write-time rules that can be toggled per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductPolicy {
    /// Reject names that match an existing product case-insensitively.
    pub enforce_unique_names: bool,
}

impl Default for ProductPolicy {
    fn default() -> Self {
        Self {
            enforce_unique_names: true,
        }
    }
}

pub async fn list_products(db: &DatabaseConnection, query: ProductQuery) -> AppResult<Page<Product>> {
    query.check_ranges()?;
    let pagination = query.pagination();
    let condition = filter_condition(&query);

    let sort_by = query.sort_by.unwrap_or_default();
    let sort_order = query.sort_order.unwrap_or_default();
    let sort_col = match sort_by {
        ProductSortBy::Id => Column::Id,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Quantity => Column::Quantity,
        ProductSortBy::CreatedAt => Column::CreatedAt,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };
    // ties need a stable order or rows drift between pages
    if sort_by != ProductSortBy::Id {
        finder = finder.order_by_asc(Column::Id);
    }

    let total = finder.clone().count(db).await?;

    let items = finder
        .limit(pagination.size)
        .offset(pagination.offset())
        .all(db)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    Ok(Page::new(items, total, pagination.page, pagination.size))
}

fn filter_condition(query: &ProductQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(name) = query.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(&fold_name(name)));
        condition = condition
            .add(Expr::col(Column::NameKey).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE)));
    }
    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }
    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }
    if let Some(min_quantity) = query.min_quantity {
        condition = condition.add(Column::Quantity.gte(min_quantity));
    }
    if let Some(max_quantity) = query.max_quantity {
        condition = condition.add(Column::Quantity.lte(max_quantity));
    }
    match query.in_stock {
        Some(true) => condition = condition.add(Column::Quantity.gt(0)),
        Some(false) => condition = condition.add(Column::Quantity.eq(0)),
        None => {}
    }

    condition
}

// Needs no quoting in any backend's string literal syntax.
const LIKE_ESCAPE: char = '!';

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

pub async fn get_product(db: &DatabaseConnection, id: i32) -> AppResult<Product> {
    Products::find_by_id(id)
        .one(db)
        .await?
        .map(Product::from)
        .ok_or_else(|| AppError::product_not_found(id))
}

pub async fn count_products(db: &DatabaseConnection) -> AppResult<u64> {
    Ok(Products::find().count(db).await?)
}

pub async fn create_product(
    db: &DatabaseConnection,
    policy: &ProductPolicy,
    payload: CreateProductRequest,
) -> AppResult<Product> {
    let draft = payload.into_draft()?;

    let txn = db.begin().await?;
    if policy.enforce_unique_names {
        ensure_name_available(&txn, &draft.name, None).await?;
    }

    let now = Utc::now();
    let name = draft.name.clone();
    let active = ActiveModel {
        id: NotSet,
        name_key: Set(fold_name(&draft.name)),
        name: Set(draft.name),
        description: Set(draft.description),
        quantity: Set(draft.quantity),
        price: Set(draft.price),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let product = active
        .insert(&txn)
        .await
        .map_err(|err| unique_violation_as_conflict(err, &name))?;
    txn.commit().await?;

    tracing::info!(product_id = product.id, name = %product.name, "product created");
    Ok(product.into())
}

pub async fn update_product(
    db: &DatabaseConnection,
    policy: &ProductPolicy,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let txn = db.begin().await?;
    let existing = Products::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;

    let draft = payload.merge_into(&existing)?;
    let name_key = fold_name(&draft.name);
    if policy.enforce_unique_names && name_key != existing.name_key {
        ensure_name_available(&txn, &draft.name, Some(id)).await?;
    }

    let updated_at = Utc::now().max(existing.created_at);
    let mut active: ActiveModel = existing.clone().into();
    let name = draft.name.clone();
    if draft.name != existing.name {
        active.name = Set(draft.name);
    }
    if name_key != existing.name_key {
        active.name_key = Set(name_key);
    }
    if draft.description != existing.description {
        active.description = Set(draft.description);
    }
    if draft.quantity != existing.quantity {
        active.quantity = Set(draft.quantity);
    }
    if draft.price != existing.price {
        active.price = Set(draft.price);
    }
    active.updated_at = Set(updated_at);

    let product = active
        .update(&txn)
        .await
        .map_err(|err| unique_violation_as_conflict(err, &name))?;
    txn.commit().await?;

    tracing::info!(product_id = product.id, "product updated");
    Ok(product.into())
}

pub async fn delete_product(db: &DatabaseConnection, id: i32) -> AppResult<()> {
    let result = Products::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::product_not_found(id));
    }

    tracing::info!(product_id = id, "product deleted");
    Ok(())
}

async fn ensure_name_available<C: ConnectionTrait>(
    db: &C,
    name: &str,
    exclude_id: Option<i32>,
) -> AppResult<()> {
    let mut finder = Products::find().filter(Column::NameKey.eq(fold_name(name)));
    if let Some(id) = exclude_id {
        finder = finder.filter(Column::Id.ne(id));
    }

    if finder.one(db).await?.is_some() {
        return Err(name_conflict(name));
    }
    Ok(())
}

fn name_conflict(name: &str) -> AppError {
    AppError::Conflict(format!("Product with name '{name}' already exists"))
}

/// A concurrent writer can pass `ensure_name_available` first; the unique
/// index on `name_key` still rejects the second row.
fn unique_violation_as_conflict(err: DbErr, name: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => name_conflict(name),
        _ => err.into(),
    }
}

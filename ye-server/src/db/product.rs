//! Product Repository
//!
//! Prices are stored as integer minor units and surfaced as `Decimal`.

use super::{RepoError, RepoResult};
use rust_decimal::Decimal;
use shared::models::{Category, Product};
use shared::util::{from_minor_units, to_minor_units};
use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

const SELECT_PRODUCT: &str = "SELECT p.id, p.name, p.description, p.price, p.stock_qty, p.category_id, p.created_by, p.created_at, c.name AS category_name, c.created_at AS category_created_at FROM product p LEFT JOIN category c ON c.id = p.category_id";

/// Product joined with its category, as read from SQLite
#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock_qty: i32,
    pub category_id: Option<i64>,
    pub created_by: Option<Uuid>,
    pub created_at: i64,
    pub category_name: Option<String>,
    pub category_created_at: Option<i64>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        let category = match (r.category_id, r.category_name, r.category_created_at) {
            (Some(id), Some(name), Some(created_at)) => Some(Category {
                id,
                name,
                created_at,
            }),
            _ => None,
        };
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            price: from_minor_units(r.price),
            stock_qty: r.stock_qty,
            category_id: r.category_id,
            category,
            created_by: r.created_by,
            created_at: r.created_at,
        }
    }
}

/// Fields written on create and update
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_qty: i32,
    pub category_id: Option<i64>,
}

fn price_minor(price: Decimal) -> RepoResult<i64> {
    if price.is_sign_negative() {
        return Err(RepoError::Validation("price must not be negative".into()));
    }
    to_minor_units(price).ok_or_else(|| RepoError::Validation("price is out of range".into()))
}

async fn fetch_many<'q>(
    pool: &SqlitePool,
    query: QueryAs<'q, Sqlite, ProductRow, SqliteArguments<'q>>,
) -> RepoResult<Vec<Product>> {
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(Product::from).collect())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{SELECT_PRODUCT} ORDER BY p.id");
    fetch_many(pool, sqlx::query_as(&sql)).await
}

pub async fn find_in_stock(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{SELECT_PRODUCT} WHERE p.stock_qty > 0 ORDER BY p.id");
    fetch_many(pool, sqlx::query_as(&sql)).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!("{SELECT_PRODUCT} WHERE p.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Product::from))
}

pub async fn find_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<Vec<Product>> {
    let sql = format!("{SELECT_PRODUCT} WHERE p.category_id = ? ORDER BY p.id");
    fetch_many(pool, sqlx::query_as(&sql).bind(category_id)).await
}

/// Case-insensitive substring match on the product name
pub async fn search_by_name(pool: &SqlitePool, query: &str) -> RepoResult<Vec<Product>> {
    let sql = format!("{SELECT_PRODUCT} WHERE instr(lower(p.name), lower(?)) > 0 ORDER BY p.id");
    fetch_many(pool, sqlx::query_as(&sql).bind(query)).await
}

pub async fn create(
    pool: &SqlitePool,
    data: ProductInput,
    created_by: Option<Uuid>,
) -> RepoResult<Product> {
    let price = price_minor(data.price)?;
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product (name, description, price, stock_qty, category_id, created_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(price)
    .bind(data.stock_qty)
    .bind(data.category_id)
    .bind(created_by)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Replace name, description, price, stock and category
pub async fn update(pool: &SqlitePool, id: i64, data: ProductInput) -> RepoResult<Product> {
    let price = price_minor(data.price)?;
    let rows = sqlx::query(
        "UPDATE product SET name = ?1, description = ?2, price = ?3, stock_qty = ?4, category_id = ?5 WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(price)
    .bind(data.stock_qty)
    .bind(data.category_id)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Returns `false` when no row matched
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::{DbService, category};
    use shared::models::CategoryCreate;
    use std::str::FromStr;

    pub(crate) fn input(name: &str, price: &str, stock: i32, category_id: Option<i64>) -> ProductInput {
        ProductInput {
            name: name.into(),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            stock_qty: stock,
            category_id,
        }
    }

    async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    #[tokio::test]
    async fn test_create_embeds_category() {
        let pool = test_pool().await;
        let cat = category::create(&pool, CategoryCreate { name: "water motors".into() })
            .await
            .unwrap();
        let creator = Uuid::new_v4();
        let p = create(&pool, input("1HP Pump", "5999.50", 4, Some(cat.id)), Some(creator))
            .await
            .unwrap();

        assert_eq!(p.price, Decimal::from_str("5999.50").unwrap());
        assert_eq!(p.category.as_ref().unwrap().name, "water motors");
        assert_eq!(p.created_by, Some(creator));
    }

    #[tokio::test]
    async fn test_negative_price_rejected() {
        let pool = test_pool().await;
        let err = create(&pool, input("Bad", "-1", 1, None), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_contains() {
        let pool = test_pool().await;
        create(&pool, input("Submersible PUMP", "100", 1, None), None)
            .await
            .unwrap();
        create(&pool, input("Chain Saw", "200", 1, None), None)
            .await
            .unwrap();

        let found = search_by_name(&pool, "pump").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Submersible PUMP");

        // LIKE wildcards are matched literally
        assert!(search_by_name(&pool, "%").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_stock_and_by_category() {
        let pool = test_pool().await;
        let cat = category::create(&pool, CategoryCreate { name: "tools".into() })
            .await
            .unwrap();
        create(&pool, input("Drill", "10", 0, Some(cat.id)), None)
            .await
            .unwrap();
        create(&pool, input("Wrench", "5", 3, Some(cat.id)), None)
            .await
            .unwrap();
        create(&pool, input("Pipe", "5", 3, None), None).await.unwrap();

        let in_stock = find_in_stock(&pool).await.unwrap();
        assert_eq!(in_stock.len(), 2);
        assert!(in_stock.iter().all(|p| p.stock_qty > 0));

        let tools = find_by_category(&pool, cat.id).await.unwrap();
        assert_eq!(tools.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = test_pool().await;
        let p = create(&pool, input("Saw", "100", 1, None), None).await.unwrap();

        let updated = update(&pool, p.id, input("Chain Saw", "120.25", 7, None))
            .await
            .unwrap();
        assert_eq!(updated.name, "Chain Saw");
        assert_eq!(updated.stock_qty, 7);
        assert_eq!(updated.created_at, p.created_at);

        let err = update(&pool, 999, input("x", "1", 1, None)).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        assert!(delete(&pool, p.id).await.unwrap());
        assert!(find_by_id(&pool, p.id).await.unwrap().is_none());
    }
}

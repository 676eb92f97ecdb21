//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM category ORDER BY id")
            .fetch_all(pool)
            .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("SELECT id, name, created_at FROM category WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(category)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM category WHERE name = ? LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Category '{}' already exists",
            data.name
        )));
    }
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO category (name, created_at) VALUES (?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(now)
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    if let Some(existing) = find_by_name(pool, &data.name).await?
        && existing.id != id
    {
        return Err(RepoError::Duplicate(format!(
            "Category '{}' already exists",
            data.name
        )));
    }
    let rows = sqlx::query("UPDATE category SET name = ? WHERE id = ?")
        .bind(&data.name)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Number of products filed under a category
pub async fn count_products(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM product WHERE category_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Returns `false` when no row matched
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    fn create_data(name: &str) -> CategoryCreate {
        CategoryCreate { name: name.into() }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let created = create(&pool, create_data("water motors")).await.unwrap();
        assert_eq!(created.name, "water motors");
        assert!(created.created_at > 0);

        let found = find_by_id(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(find_all(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let pool = test_pool().await;
        create(&pool, create_data("pipes")).await.unwrap();
        let err = create(&pool, create_data("pipes")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_rename() {
        let pool = test_pool().await;
        let tools = create(&pool, create_data("tools")).await.unwrap();
        create(&pool, create_data("pipes")).await.unwrap();

        let renamed = update(&pool, tools.id, CategoryUpdate { name: "hand tools".into() })
            .await
            .unwrap();
        assert_eq!(renamed.name, "hand tools");

        // Keeping its own name is not a conflict
        update(&pool, tools.id, CategoryUpdate { name: "hand tools".into() })
            .await
            .unwrap();

        let err = update(&pool, tools.id, CategoryUpdate { name: "pipes".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let err = update(&pool, 999, CategoryUpdate { name: "x".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let c = create(&pool, create_data("chain saws")).await.unwrap();
        assert!(delete(&pool, c.id).await.unwrap());
        assert!(!delete(&pool, c.id).await.unwrap());
        assert_eq!(count_products(&pool, c.id).await.unwrap(), 0);
    }
}

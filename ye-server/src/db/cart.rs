//! Cart Repository

use super::product::ProductRow;
use super::{RepoError, RepoResult};
use crate::utils::validation::MAX_CART_QUANTITY;
use shared::models::{CartItem, Product};
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT_CART_ITEM: &str = "SELECT ci.id AS cart_id, ci.user_id, ci.quantity, ci.added_at, p.id, p.name, p.description, p.price, p.stock_qty, p.category_id, p.created_by, p.created_at, c.name AS category_name, c.created_at AS category_created_at FROM cart_item ci JOIN product p ON p.id = ci.product_id LEFT JOIN category c ON c.id = p.category_id";

#[derive(sqlx::FromRow)]
struct CartItemRow {
    cart_id: i64,
    user_id: Uuid,
    quantity: i32,
    added_at: i64,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl From<CartItemRow> for CartItem {
    fn from(r: CartItemRow) -> Self {
        let product = Product::from(r.product);
        Self {
            id: r.cart_id,
            user_id: r.user_id,
            product_id: product.id,
            product: Some(product),
            quantity: r.quantity,
            added_at: r.added_at,
        }
    }
}

/// A user's cart lines, oldest first
pub async fn find_by_user(pool: &SqlitePool, user_id: Uuid) -> RepoResult<Vec<CartItem>> {
    let rows = sqlx::query_as::<_, CartItemRow>(&format!(
        "{SELECT_CART_ITEM} WHERE ci.user_id = ? ORDER BY ci.added_at, ci.id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(CartItem::from).collect())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<CartItem>> {
    let rows = sqlx::query_as::<_, CartItemRow>(&format!("{SELECT_CART_ITEM} ORDER BY ci.id"))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(CartItem::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CartItem>> {
    let row = sqlx::query_as::<_, CartItemRow>(&format!("{SELECT_CART_ITEM} WHERE ci.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(CartItem::from))
}

fn check_quantity(quantity: i32) -> RepoResult<()> {
    if !(1..=MAX_CART_QUANTITY).contains(&quantity) {
        return Err(RepoError::Validation(format!(
            "quantity must be between 1 and {MAX_CART_QUANTITY}"
        )));
    }
    Ok(())
}

/// Add a product to a user's cart
///
/// A second add of the same product sums into the existing line, so a
/// (user, product) pair never has more than one row. A merge that would
/// push the line past [`MAX_CART_QUANTITY`] leaves it untouched.
pub async fn add(
    pool: &SqlitePool,
    user_id: Uuid,
    product_id: i64,
    quantity: i32,
) -> RepoResult<CartItem> {
    check_quantity(quantity)?;
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO cart_item (user_id, product_id, quantity, added_at) VALUES (?1, ?2, ?3, ?4) ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = cart_item.quantity + excluded.quantity WHERE cart_item.quantity + excluded.quantity <= ?5 RETURNING id",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .bind(MAX_CART_QUANTITY)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        RepoError::Validation(format!(
            "cart line would exceed {MAX_CART_QUANTITY} units"
        ))
    })?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to add cart item".into()))
}

/// Set the quantity of a cart line
pub async fn update_quantity(pool: &SqlitePool, id: i64, quantity: i32) -> RepoResult<CartItem> {
    check_quantity(quantity)?;
    let rows = sqlx::query("UPDATE cart_item SET quantity = ? WHERE id = ?")
        .bind(quantity)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cart item {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cart item {id} not found")))
}

/// Returns `false` when no row matched
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Remove every line of a user's cart, returning how many were removed
pub async fn clear(pool: &SqlitePool, user_id: Uuid) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::product::tests::input;
    use crate::db::{DbService, product};

    async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    #[tokio::test]
    async fn test_add_same_product_merges() {
        let pool = test_pool().await;
        let p = product::create(&pool, input("Pump", "100", 5, None), None)
            .await
            .unwrap();
        let user = Uuid::new_v4();

        let first = add(&pool, user, p.id, 2).await.unwrap();
        let second = add(&pool, user, p.id, 3).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity, 5);
        let cart = find_by_user(&pool, user).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].product.as_ref().unwrap().name, "Pump");
    }

    #[tokio::test]
    async fn test_merge_past_limit_keeps_line() {
        let pool = test_pool().await;
        let p = product::create(&pool, input("Pipe", "10", 5, None), None)
            .await
            .unwrap();
        let user = Uuid::new_v4();

        add(&pool, user, p.id, MAX_CART_QUANTITY).await.unwrap();
        assert!(matches!(
            add(&pool, user, p.id, MAX_CART_QUANTITY).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            add(&pool, user, p.id, i32::MAX).await.unwrap_err(),
            RepoError::Validation(_)
        ));

        // The cart still reads back with the original line
        let cart = find_by_user(&pool, user).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, MAX_CART_QUANTITY);
    }

    #[tokio::test]
    async fn test_carts_are_per_user() {
        let pool = test_pool().await;
        let p = product::create(&pool, input("Pump", "100", 5, None), None)
            .await
            .unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        add(&pool, alice, p.id, 1).await.unwrap();
        add(&pool, bob, p.id, 1).await.unwrap();

        assert_eq!(find_by_user(&pool, alice).await.unwrap().len(), 1);
        assert_eq!(clear(&pool, alice).await.unwrap(), 1);
        assert!(find_by_user(&pool, alice).await.unwrap().is_empty());
        assert_eq!(find_by_user(&pool, bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_quantity_must_be_positive() {
        let pool = test_pool().await;
        let p = product::create(&pool, input("Saw", "10", 1, None), None)
            .await
            .unwrap();
        let user = Uuid::new_v4();
        assert!(matches!(
            add(&pool, user, p.id, 0).await.unwrap_err(),
            RepoError::Validation(_)
        ));

        let item = add(&pool, user, p.id, 1).await.unwrap();
        let item = update_quantity(&pool, item.id, 4).await.unwrap();
        assert_eq!(item.quantity, 4);
        assert!(matches!(
            update_quantity(&pool, item.id, 0).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            update_quantity(&pool, item.id, MAX_CART_QUANTITY + 1).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            update_quantity(&pool, 999, 2).await.unwrap_err(),
            RepoError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_line() {
        let pool = test_pool().await;
        let p = product::create(&pool, input("Pipe", "10", 1, None), None)
            .await
            .unwrap();
        let item = add(&pool, Uuid::new_v4(), p.id, 1).await.unwrap();
        assert!(delete(&pool, item.id).await.unwrap());
        assert!(!delete(&pool, item.id).await.unwrap());
    }
}

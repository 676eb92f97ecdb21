//! Order Repository
//!
//! Reads return orders with their item snapshots attached. The write path
//! used by checkout is split into transaction-scoped steps so the caller can
//! run them inside one transaction and retry on an order-number collision.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItem, OrderStatus, PaymentMethod};
use shared::util::from_minor_units;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

const SELECT_ORDER: &str = "SELECT id, user_id, order_number, total_amount, status, payment_method, shipping_address, customer_name, customer_phone, notes, created_at, updated_at FROM orders";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: Uuid,
    order_number: String,
    total_amount: i64,
    status: OrderStatus,
    payment_method: PaymentMethod,
    shipping_address: String,
    customer_name: String,
    customer_phone: String,
    notes: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            order_number: self.order_number,
            total_amount: from_minor_units(self.total_amount),
            status: self.status,
            payment_method: self.payment_method,
            shipping_address: self.shipping_address,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            notes: self.notes,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    product_name: String,
    quantity: i32,
    price_at_purchase: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        Self {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            product_name: r.product_name,
            quantity: r.quantity,
            price_at_purchase: from_minor_units(r.price_at_purchase),
        }
    }
}

/// Load item snapshots for a batch of orders and attach them
async fn with_items(pool: &SqlitePool, rows: Vec<OrderRow>) -> RepoResult<Vec<Order>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; rows.len()].join(", ");
    let sql = format!(
        "SELECT id, order_id, product_id, product_name, quantity, price_at_purchase FROM order_item WHERE order_id IN ({placeholders}) ORDER BY id"
    );
    let mut query = sqlx::query_as::<_, OrderItemRow>(&sql);
    for row in &rows {
        query = query.bind(row.id);
    }
    let mut grouped: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in query.fetch_all(pool).await? {
        grouped
            .entry(item.order_id)
            .or_default()
            .push(OrderItem::from(item));
    }
    Ok(rows
        .into_iter()
        .map(|row| {
            let items = grouped.remove(&row.id).unwrap_or_default();
            row.into_order(items)
        })
        .collect())
}

/// All orders, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "{SELECT_ORDER} ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;
    with_items(pool, rows).await
}

/// A user's orders, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: Uuid) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "{SELECT_ORDER} WHERE user_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    with_items(pool, rows).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match row {
        Some(row) => Ok(with_items(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

// =============================================================================
// Checkout steps (transaction-scoped)
// =============================================================================

/// Cart line joined with the live product name and price
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    /// Minor units
    pub price: i64,
}

/// Order header as written by checkout
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub user_id: Uuid,
    pub order_number: &'a str,
    /// Minor units
    pub total_amount: i64,
    pub payment_method: PaymentMethod,
    pub shipping_address: &'a str,
    pub customer_name: &'a str,
    pub customer_phone: &'a str,
    pub notes: Option<&'a str>,
}

pub async fn cart_lines(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: Uuid,
) -> RepoResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
        "SELECT ci.product_id, p.name AS product_name, ci.quantity, p.price FROM cart_item ci JOIN product p ON p.id = ci.product_id WHERE ci.user_id = ? ORDER BY ci.added_at, ci.id",
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(lines)
}

/// Orders whose number already contains the given `yyyyMMdd` date
pub async fn count_for_date(tx: &mut Transaction<'_, Sqlite>, date: &str) -> RepoResult<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE instr(order_number, ?) > 0")
            .bind(date)
            .fetch_one(&mut **tx)
            .await?;
    Ok(count)
}

/// Insert the order header; a taken order number surfaces as `RepoError::Duplicate`
pub async fn insert_order(
    tx: &mut Transaction<'_, Sqlite>,
    order: &NewOrder<'_>,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (user_id, order_number, total_amount, status, payment_method, shipping_address, customer_name, customer_phone, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10) RETURNING id",
    )
    .bind(order.user_id)
    .bind(order.order_number)
    .bind(order.total_amount)
    .bind(OrderStatus::Pending)
    .bind(order.payment_method)
    .bind(order.shipping_address)
    .bind(order.customer_name)
    .bind(order.customer_phone)
    .bind(order.notes)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn insert_item(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: i64,
    line: &CartLine,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_item (order_id, product_id, product_name, quantity, price_at_purchase) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(order_id)
    .bind(line.product_id)
    .bind(&line.product_name)
    .bind(line.quantity)
    .bind(line.price)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn clear_cart(tx: &mut Transaction<'_, Sqlite>, user_id: Uuid) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected())
}

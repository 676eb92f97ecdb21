//! Cart-to-order conversion
//!
//! One transaction reads the cart, writes the order header and its item
//! snapshots, and empties the cart. Order numbers are `YE-<yyyyMMdd>-<seq>`
//! where `seq` is one more than the orders already numbered for that day.
//! The transaction starts with `BEGIN IMMEDIATE`, taking SQLite's write
//! lock before the day's orders are counted, so concurrent checkouts queue
//! on the busy timeout instead of failing on a stale snapshot. The UNIQUE
//! constraint on `order_number` stays as a backstop: a collision rolls back
//! and recounts.

use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderCreate};
use sqlx::SqlitePool;

use crate::db::order::{self, CartLine, NewOrder};
use crate::db::RepoError;
use crate::error::{ServiceError, ServiceResult};

/// Attempts before giving up on a contended order number
const MAX_ATTEMPTS: usize = 5;

/// `YE-20250314-0007`
pub fn format_order_number(date: &str, seq: i64) -> String {
    format!("YE-{date}-{seq:04}")
}

/// Sum of price × quantity over the cart lines, in minor units
pub fn order_total(lines: &[CartLine]) -> Option<i64> {
    lines.iter().try_fold(0i64, |acc, line| {
        line.price
            .checked_mul(i64::from(line.quantity))
            .and_then(|sub| acc.checked_add(sub))
    })
}

/// Turn the user's cart into an order dated `date` (`yyyyMMdd`)
pub async fn place_order(pool: &SqlitePool, data: &OrderCreate, date: &str) -> ServiceResult<Order> {
    for attempt in 1..=MAX_ATTEMPTS {
        match try_place_order(pool, data, date).await {
            Err(ServiceError::App(err)) if err.code == ErrorCode::OrderNumberConflict => {
                tracing::warn!(attempt, user_id = %data.user_id, "Order number taken, retrying");
            }
            other => return other,
        }
    }
    Err(AppError::new(ErrorCode::OrderNumberConflict).into())
}

async fn try_place_order(
    pool: &SqlitePool,
    data: &OrderCreate,
    date: &str,
) -> ServiceResult<Order> {
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let lines = order::cart_lines(&mut tx, data.user_id).await?;
    if lines.is_empty() {
        return Err(AppError::empty_cart().into());
    }
    let total_amount = order_total(&lines)
        .ok_or_else(|| AppError::with_message(ErrorCode::ValueOutOfRange, "Order total is too large"))?;

    let seq = order::count_for_date(&mut tx, date).await? + 1;
    let order_number = format_order_number(date, seq);

    let header = NewOrder {
        user_id: data.user_id,
        order_number: &order_number,
        total_amount,
        payment_method: data.payment_method,
        shipping_address: &data.shipping_address,
        customer_name: &data.customer_name,
        customer_phone: &data.customer_phone,
        notes: data.notes.as_deref(),
    };
    let order_id = match order::insert_order(&mut tx, &header).await {
        Ok(id) => id,
        // Dropping `tx` rolls back
        Err(RepoError::Duplicate(_)) => {
            return Err(AppError::new(ErrorCode::OrderNumberConflict).into());
        }
        Err(e) => return Err(e.into()),
    };

    for line in &lines {
        order::insert_item(&mut tx, order_id, line).await?;
    }
    order::clear_cart(&mut tx, data.user_id).await?;
    tx.commit().await?;

    tracing::info!(
        order_id,
        order_number = %order_number,
        items = lines.len(),
        "Order placed"
    );

    order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| ServiceError::Db("Order vanished after commit".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::product::tests::input;
    use crate::db::{DbService, cart, product};
    use shared::models::{OrderStatus, PaymentMethod};
    use std::str::FromStr;
    use uuid::Uuid;

    fn line(price: i64, quantity: i32) -> CartLine {
        CartLine {
            product_id: 1,
            product_name: "Pump".into(),
            quantity,
            price,
        }
    }

    fn checkout(user_id: Uuid) -> OrderCreate {
        OrderCreate {
            user_id,
            payment_method: PaymentMethod::CashOnDelivery,
            shipping_address: "12 MG Road, Pune".into(),
            customer_name: "Asha".into(),
            customer_phone: "9800000000".into(),
            notes: Some("Call before delivery".into()),
        }
    }

    #[test]
    fn test_format_order_number() {
        assert_eq!(format_order_number("20250314", 7), "YE-20250314-0007");
        assert_eq!(format_order_number("20250314", 12345), "YE-20250314-12345");
    }

    #[test]
    fn test_order_total() {
        assert_eq!(order_total(&[line(599_950, 2), line(100, 3)]), Some(1_200_200));
        assert_eq!(order_total(&[]), Some(0));
        assert_eq!(order_total(&[line(i64::MAX, 2)]), None);
    }

    #[tokio::test]
    async fn test_place_order_snapshots_and_clears_cart() {
        let pool = DbService::in_memory().await.unwrap().pool;
        let user = Uuid::new_v4();
        let pump = product::create(&pool, input("Pump", "5999.50", 5, None), None)
            .await
            .unwrap();
        let pipe = product::create(&pool, input("Pipe", "120", 50, None), None)
            .await
            .unwrap();
        cart::add(&pool, user, pump.id, 1).await.unwrap();
        cart::add(&pool, user, pipe.id, 4).await.unwrap();

        let order = place_order(&pool, &checkout(user), "20250314").await.unwrap();

        assert_eq!(order.order_number, "YE-20250314-0001");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert_eq!(
            order.total_amount,
            rust_decimal::Decimal::from_str("6479.50").unwrap()
        );
        assert!(cart::find_by_user(&pool, user).await.unwrap().is_empty());

        // Later catalog edits leave the snapshot alone
        product::update(&pool, pump.id, input("Pump v2", "1", 5, None))
            .await
            .unwrap();
        let reloaded = order::find_by_id(&pool, order.id).await.unwrap().unwrap();
        assert_eq!(reloaded.items[0].product_name, "Pump");
        assert_eq!(reloaded.items[0].price_at_purchase.to_string(), "5999.50");
    }

    #[tokio::test]
    async fn test_sequence_is_per_day() {
        let pool = DbService::in_memory().await.unwrap().pool;
        let p = product::create(&pool, input("Saw", "10", 5, None), None)
            .await
            .unwrap();

        let mut numbers = Vec::new();
        for date in ["20250314", "20250314", "20250315"] {
            let user = Uuid::new_v4();
            cart::add(&pool, user, p.id, 1).await.unwrap();
            numbers.push(place_order(&pool, &checkout(user), date).await.unwrap().order_number);
        }
        assert_eq!(
            numbers,
            vec!["YE-20250314-0001", "YE-20250314-0002", "YE-20250315-0001"]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_get_distinct_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkout.db");
        let pool = DbService::new(path.to_str().unwrap()).await.unwrap().pool;
        let p = product::create(&pool, input("Chain Saw", "8999", 50, None), None)
            .await
            .unwrap();

        let mut users = Vec::new();
        for _ in 0..16 {
            let user = Uuid::new_v4();
            cart::add(&pool, user, p.id, 1).await.unwrap();
            users.push(user);
        }

        let handles: Vec<_> = users
            .into_iter()
            .map(|user| {
                let pool = pool.clone();
                tokio::spawn(async move { place_order(&pool, &checkout(user), "20250314").await })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().order_number);
        }
        numbers.sort();
        let expected: Vec<String> = (1..=16).map(|seq| format_order_number("20250314", seq)).collect();
        assert_eq!(numbers, expected);
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let pool = DbService::in_memory().await.unwrap().pool;
        let err = place_order(&pool, &checkout(Uuid::new_v4()), "20250314")
            .await
            .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::OrderEmpty);
        assert!(order::find_all(&pool).await.unwrap().is_empty());
    }
}

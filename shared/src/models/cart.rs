//! Cart Model

use super::product::Product;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line in a user's cart, with the product embedded
///
/// At most one line exists per (user, product).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub user_id: Uuid,
    pub product_id: i64,
    pub product: Option<Product>,
    pub quantity: i32,
    pub added_at: i64,
}

/// Add to cart payload; merges into an existing line for the same product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemCreate {
    pub user_id: Uuid,
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Set quantity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub quantity: i32,
}

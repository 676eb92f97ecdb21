//! Product Model

use super::category::Category;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product entity with its category embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_qty: i32,
    pub category_id: Option<i64>,
    /// Populated by a join, `None` for uncategorised products
    pub category: Option<Category>,
    pub created_by: Option<Uuid>,
    pub created_at: i64,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock_qty > 0
    }
}

/// Category reference as sent by the admin dashboard (`{"category": {"id": 3}}`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_qty: i32,
    pub category_id: Option<i64>,
    pub category: Option<CategoryRef>,
    pub created_by: Option<Uuid>,
}

impl ProductCreate {
    /// `categoryId` wins over a nested `category.id`
    pub fn resolved_category_id(&self) -> Option<i64> {
        self.category_id.or(self.category.map(|c| c.id))
    }
}

/// Update product payload
///
/// Replaces name, description, price, stock and category wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_qty: i32,
    pub category_id: Option<i64>,
    pub category: Option<CategoryRef>,
}

impl ProductUpdate {
    pub fn resolved_category_id(&self) -> Option<i64> {
        self.category_id.or(self.category.map(|c| c.id))
    }
}

/// Query string for `GET /products/search`
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSearch {
    #[serde(default)]
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_accepts_nested_category() {
        let json = r#"{"name":"Pump","price":5999.5,"stockQty":3,"category":{"id":4}}"#;
        let data: ProductCreate = serde_json::from_str(json).unwrap();
        assert_eq!(data.resolved_category_id(), Some(4));
        assert!(data.created_by.is_none());
    }

    #[test]
    fn test_category_id_takes_precedence() {
        let json = r#"{"name":"Saw","price":100,"stockQty":1,"categoryId":2,"category":{"id":9}}"#;
        let data: ProductCreate = serde_json::from_str(json).unwrap();
        assert_eq!(data.resolved_category_id(), Some(2));
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product {
            id: 1,
            name: "Pump".into(),
            description: None,
            price: Decimal::new(599_950, 2),
            stock_qty: 0,
            category_id: None,
            category: None,
            created_by: None,
            created_at: 0,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["stockQty"], 0);
        assert_eq!(json["price"], 5999.5);
        assert!(!product.in_stock());
    }
}

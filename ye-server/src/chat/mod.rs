//! Rule-based product search over chat messages
//!
//! - `intent`: message → price bounds, category, keywords
//! - `matcher`: intent × catalog → at most ten products
//! - `reply`: the sentence shown above the results

pub mod intent;
pub mod matcher;
pub mod reply;

use shared::models::{ChatResponse, Product};
use sqlx::SqlitePool;

use crate::db::product;
pub use intent::{IntentError, QueryIntent};

/// Prompts offered by the chat widget before the first message
pub const SUGGESTIONS: &[&str] = &[
    "Show me water pumps under Rs. 6000",
    "I need a motor for home use",
    "What chain saws do you have?",
    "Show all products in stock",
    "Pumps with 1HP power",
];

/// Answer a message against an already loaded catalog
pub fn answer(message: &str, catalog: &[Product]) -> ChatResponse {
    let intent = QueryIntent::parse(message);
    tracing::debug!(
        keywords = ?intent.keywords,
        max_price = ?intent.max_price,
        min_price = ?intent.min_price,
        category = ?intent.category,
        "Parsed chat intent"
    );
    for err in &intent.errors {
        tracing::warn!("Chat intent field skipped: {err}");
    }

    let products: Vec<Product> = matcher::find_matches(catalog, &intent)
        .into_iter()
        .cloned()
        .collect();
    tracing::info!(count = products.len(), "Chat query matched products");

    ChatResponse {
        message: reply::compose(&intent, products.len()),
        count: products.len(),
        products,
    }
}

/// Fixed reply used whenever the query cannot be served
pub fn apology() -> ChatResponse {
    ChatResponse {
        message: reply::APOLOGY_MESSAGE.to_string(),
        products: Vec::new(),
        count: 0,
    }
}

/// Load the catalog and answer; never fails
pub async fn respond(pool: &SqlitePool, message: &str) -> ChatResponse {
    match product::find_all(pool).await {
        Ok(catalog) => answer(message, &catalog),
        Err(e) => {
            tracing::error!("Chat catalog load failed: {e}");
            apology()
        }
    }
}

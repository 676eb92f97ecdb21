//! Product filtering against a parsed intent

use shared::models::Product;

use super::intent::QueryIntent;

/// Maximum products returned for one query
pub const MAX_RESULTS: usize = 10;

/// Every set predicate must hold
pub fn matches(product: &Product, intent: &QueryIntent) -> bool {
    if let Some(max) = intent.max_price
        && product.price > max
    {
        return false;
    }

    if let Some(min) = intent.min_price
        && product.price < min
    {
        return false;
    }

    if let Some(label) = intent.category {
        let name = product
            .category
            .as_ref()
            .map(|c| c.name.to_lowercase())
            .unwrap_or_default();
        if !name.contains(label) {
            return false;
        }
    }

    if !intent.keywords.is_empty() {
        let text = format!(
            "{} {}",
            product.name,
            product.description.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        if !intent.keywords.iter().any(|k| text.contains(k.as_str())) {
            return false;
        }
    }

    true
}

/// First `MAX_RESULTS` matches in catalog order
pub fn find_matches<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    intent: &QueryIntent,
) -> Vec<&'a Product> {
    products
        .into_iter()
        .filter(|p| matches(p, intent))
        .take(MAX_RESULTS)
        .collect()
}

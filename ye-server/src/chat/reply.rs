//! Reply sentences for chat results

use super::intent::QueryIntent;

pub const NO_MATCH_MESSAGE: &str =
    "I couldn't find any products matching your criteria. Try adjusting your budget or search terms.";

pub const APOLOGY_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

const SINGLE_MATCH_MESSAGE: &str = "I found 1 product that matches your search:";

pub fn compose(intent: &QueryIntent, count: usize) -> String {
    match count {
        0 => NO_MATCH_MESSAGE.to_string(),
        1 => SINGLE_MATCH_MESSAGE.to_string(),
        n => {
            let mut message = format!("I found {n} products");
            if let Some(max) = intent.max_price {
                message.push_str(&format!(" under Rs. {}", max.normalize()));
            }
            if let Some(category) = intent.category {
                message.push_str(&format!(" in {category}"));
            }
            message.push(':');
            message
        }
    }
}

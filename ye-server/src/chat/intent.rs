//! Query-intent extraction
//!
//! Turns free text like "show me water pumps under rs. 6000" into price
//! bounds, a category label and search keywords. Each field is extracted
//! independently; a field whose extraction fails stays unset and the error
//! is kept on the intent so callers can tell "no match" from "bad input".

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static MAX_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:under|below|less than|<|max|maximum)\s*(?:rs\.?\s*)?([0-9,]+)")
        .expect("valid regex")
});

static MAX_PRICE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9,]+)\s*(?:or less|max|maximum)").expect("valid regex")
});

static MIN_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:above|over|more than|>|min|minimum)\s*(?:rs\.?\s*)?([0-9,]+)")
        .expect("valid regex")
});

/// (label, trigger keywords), first hit wins
pub const CATEGORY_TABLE: &[(&str, &[&str])] = &[
    ("water motors", &["water motor", "water pump", "pump", "motor"]),
    ("chain saws", &["chain saw", "chainsaw", "saw"]),
    ("tools", &["tool", "equipment"]),
    ("pipes", &["pipe", "piping"]),
];

const STOP_WORDS: &[&str] = &[
    "show", "me", "find", "get", "i", "need", "want", "looking", "for", "a", "an", "the", "in",
    "under", "above", "below", "rs", "rupees", "price", "budget", "around", "approximately",
];

/// Tokens this short never become keywords
const MIN_KEYWORD_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("{field}: '{raw}' is not a valid amount")]
    InvalidAmount { field: &'static str, raw: String },
}

/// Structured filter parsed from a chat message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryIntent {
    pub max_price: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub category: Option<&'static str>,
    pub keywords: Vec<String>,
    /// Extraction failures for fields that were left unset
    pub errors: Vec<IntentError>,
}

impl QueryIntent {
    /// Parse a message. Matching is case-insensitive.
    pub fn parse(message: &str) -> Self {
        let query = message.to_lowercase();
        let mut intent = QueryIntent {
            category: extract_category(&query),
            keywords: extract_keywords(&query),
            ..Default::default()
        };

        match extract_max_price(&query) {
            Ok(v) => intent.max_price = v,
            Err(e) => intent.errors.push(e),
        }
        match extract_min_price(&query) {
            Ok(v) => intent.min_price = v,
            Err(e) => intent.errors.push(e),
        }

        intent
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, IntentError> {
    let digits: String = raw.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&digits).map_err(|_| IntentError::InvalidAmount {
        field,
        raw: raw.to_string(),
    })
}

fn first_capture<'a>(re: &Regex, query: &'a str) -> Option<&'a str> {
    re.captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// "under 6000", "below rs. 5,000", "6000 or less"
pub fn extract_max_price(query: &str) -> Result<Option<Decimal>, IntentError> {
    first_capture(&MAX_PRICE, query)
        .or_else(|| first_capture(&MAX_PRICE_SUFFIX, query))
        .map(|raw| parse_amount("maxPrice", raw))
        .transpose()
}

/// "above 3000", "more than rs 2,000"
pub fn extract_min_price(query: &str) -> Result<Option<Decimal>, IntentError> {
    first_capture(&MIN_PRICE, query)
        .map(|raw| parse_amount("minPrice", raw))
        .transpose()
}

pub fn extract_category(query: &str) -> Option<&'static str> {
    CATEGORY_TABLE
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| query.contains(k)))
        .map(|(label, _)| *label)
}

pub fn extract_keywords(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|word| word.len() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_water_pumps_under_6000() {
        let intent = QueryIntent::parse("Show me water pumps under Rs. 6000");
        assert_eq!(intent.category, Some("water motors"));
        assert_eq!(intent.max_price, Some(dec("6000")));
        assert_eq!(intent.min_price, None);
        for stop in ["show", "me", "under", "rs"] {
            assert!(!intent.keywords.iter().any(|k| k == stop), "{stop} kept");
        }
        assert_eq!(intent.keywords, vec!["water", "pumps", "6000"]);
        assert!(!intent.has_errors());
    }

    #[test]
    fn test_max_price_forms() {
        assert_eq!(extract_max_price("under 5000"), Ok(Some(dec("5000"))));
        assert_eq!(extract_max_price("below rs 5,500"), Ok(Some(dec("5500"))));
        assert_eq!(extract_max_price("less than rs.7000"), Ok(Some(dec("7000"))));
        assert_eq!(extract_max_price("< 6000"), Ok(Some(dec("6000"))));
        assert_eq!(extract_max_price("6000 or less"), Ok(Some(dec("6000"))));
        assert_eq!(extract_max_price("a pump"), Ok(None));
    }

    #[test]
    fn test_min_price_forms() {
        assert_eq!(extract_min_price("above 2000"), Ok(Some(dec("2000"))));
        assert_eq!(extract_min_price("more than rs. 3,000"), Ok(Some(dec("3000"))));
        assert_eq!(extract_min_price("> 100"), Ok(Some(dec("100"))));
        assert_eq!(extract_min_price("cheap saw"), Ok(None));
    }

    #[test]
    fn test_bad_amount_is_reported_not_fatal() {
        let intent = QueryIntent::parse("pumps under ,,, above 100");
        assert_eq!(intent.max_price, None);
        assert_eq!(intent.min_price, Some(dec("100")));
        assert_eq!(intent.category, Some("water motors"));
        assert_eq!(
            intent.errors,
            vec![IntentError::InvalidAmount {
                field: "maxPrice",
                raw: ",,,".into()
            }]
        );
    }

    #[test]
    fn test_category_order_and_miss() {
        assert_eq!(extract_category("motor with a saw"), Some("water motors"));
        assert_eq!(extract_category("a chainsaw"), Some("chain saws"));
        assert_eq!(extract_category("garden equipment"), Some("tools"));
        assert_eq!(extract_category("pvc piping"), Some("pipes"));
        assert_eq!(extract_category("something else"), None);
    }

    #[test]
    fn test_keywords_strip_punctuation_and_short_tokens() {
        assert_eq!(
            extract_keywords("i need a 1hp motor, for the farm!"),
            vec!["1hp", "motor", "farm"]
        );
        assert!(extract_keywords("").is_empty());
    }
}

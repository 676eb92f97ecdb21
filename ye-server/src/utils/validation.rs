//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, equipment type, customer name
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions, issue reports, order notes, admin notes
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone, brand, preferred date/time
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Shipping and pickup addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Chat messages
pub const MAX_CHAT_LEN: usize = 1000;

// ── Numeric limits ──────────────────────────────────────────────────

/// Largest quantity a single cart line may hold, merges included
pub const MAX_CART_QUANTITY: i32 = 9_999;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a partial-update field: absent is fine, present must be non-blank.
pub fn validate_present_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_required_text(v, field, max_len),
        None => Ok(()),
    }
}

pub fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price.is_sign_negative() {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidPrice,
            "price must not be negative",
        ));
    }
    Ok(())
}

pub fn validate_stock(stock_qty: i32) -> Result<(), AppError> {
    if stock_qty < 0 {
        return Err(AppError::with_message(
            ErrorCode::ProductInvalidStock,
            "stock quantity must not be negative",
        ));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), AppError> {
    if !(1..=MAX_CART_QUANTITY).contains(&quantity) {
        return Err(AppError::new(ErrorCode::CartInvalidQuantity).with_detail("quantity", quantity));
    }
    Ok(())
}

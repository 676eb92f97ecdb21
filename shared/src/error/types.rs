//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every handler failure is reported through this type. It carries:
/// - a stable [`ErrorCode`] the storefront can switch on
/// - a human-readable message
/// - optional structured details (offending field, resource name, ...)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn too_many_attempts() -> Self {
        Self::new(ErrorCode::TooManyAttempts)
    }

    // ==================== Domain constructors ====================

    pub fn product_not_found(id: i64) -> Self {
        Self::new(ErrorCode::ProductNotFound).with_detail("id", id)
    }

    pub fn category_not_found(id: i64) -> Self {
        Self::new(ErrorCode::CategoryNotFound).with_detail("id", id)
    }

    pub fn cart_item_not_found(id: i64) -> Self {
        Self::new(ErrorCode::CartItemNotFound).with_detail("id", id)
    }

    pub fn order_not_found(id: i64) -> Self {
        Self::new(ErrorCode::OrderNotFound).with_detail("id", id)
    }

    pub fn repair_request_not_found(id: impl Into<String>) -> Self {
        Self::new(ErrorCode::RepairRequestNotFound).with_detail("id", id.into())
    }

    pub fn empty_cart() -> Self {
        Self::new(ErrorCode::OrderEmpty)
    }
}

/// JSON body of every error response
///
/// - `code`: numeric [`ErrorCode`]
/// - `message`: human-readable message
/// - `details`: structured context, omitted when empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ErrorBody::from(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "email")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "email");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_domain_constructors() {
        let err = AppError::product_not_found(42);
        assert_eq!(err.code, ErrorCode::ProductNotFound);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.details.unwrap().get("id").unwrap(), 42);

        let err = AppError::empty_cart();
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Cart is empty");

        let err = AppError::repair_request_not_found("abc");
        assert_eq!(err.code, ErrorCode::RepairRequestNotFound);
    }

    #[test]
    fn test_error_body() {
        let err = AppError::order_not_found(7);
        let body = ErrorBody::from(&err);

        assert_eq!(body.code, 4001);
        assert_eq!(body.message, "Order not found");
        assert!(body.details.is_some());
    }

    #[test]
    fn test_error_body_skips_empty_details() {
        let json = serde_json::to_value(ErrorBody::from(&AppError::empty_cart())).unwrap();
        assert_eq!(json["code"], 4007);
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_into_response_status_and_body() {
        use axum::response::IntoResponse;
        use http_body_util::BodyExt;

        let response = AppError::category_not_found(3).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], 6101);
        assert_eq!(json["details"]["id"], 3);
    }
}

//! Auth DTOs
//!
//! Identity is owned by an external provider; the server only mints and
//! checks tokens for the identity the client presents.

use serde::{Deserialize, Serialize};

/// Login payload. Fields are optional so a missing one yields a 400 with a
/// readable message instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub user_id: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub token: Option<String>,
}

/// `{"valid": false}` on any failure, claims flattened in on success
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl VerifyResponse {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            user_id: None,
            email: None,
            role: None,
        }
    }

    pub fn valid(user: CurrentUser) -> Self {
        Self {
            valid: true,
            user_id: Some(user.user_id),
            email: Some(user.email),
            role: Some(user.role),
        }
    }
}

/// Authenticated caller, extracted from a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: String,
    pub email: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_verify_response_is_minimal() {
        let json = serde_json::to_string(&VerifyResponse::invalid()).unwrap();
        assert_eq!(json, r#"{"valid":false}"#);
    }

    #[test]
    fn test_login_response_type_field() {
        let resp = LoginResponse {
            token: "t".into(),
            token_type: "Bearer".into(),
            user_id: "u".into(),
            email: "e".into(),
            role: "customer".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["type"], "Bearer");
        assert_eq!(json["userId"], "u");
    }
}

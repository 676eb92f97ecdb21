//! Login token issue and verification
//!
//! HS512-signed JWT, subject = user id, valid for 24 hours.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::models::CurrentUser;

const JWT_EXPIRY_HOURS: i64 = 24;

/// JWT claims carried by a login token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub role: String,
    /// Issued at (Unix timestamp seconds)
    pub iat: i64,
    /// Expiration (Unix timestamp seconds)
    pub exp: i64,
}

impl From<Claims> for CurrentUser {
    fn from(c: Claims) -> Self {
        Self {
            user_id: c.user_id,
            email: c.email,
            role: c.role,
        }
    }
}

/// Create a signed token for the given identity
pub fn create_token(
    user: &CurrentUser,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user.user_id.clone(),
        user_id: user.user_id.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS512),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS512);
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> CurrentUser {
        CurrentUser {
            user_id: "u-42".into(),
            email: "asha@example.com".into(),
            role: "customer".into(),
        }
    }

    #[test]
    fn test_token_carries_identity() {
        let token = create_token(&user(), "secret").unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "u-42");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(CurrentUser::from(claims), user());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(&user(), "secret").unwrap();
        assert!(verify_token(&token, "other").is_err());
        assert!(verify_token("not.a.token", "secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "u-1".into(),
            user_id: "u-1".into(),
            email: "a@b.c".into(),
            role: "customer".into(),
            iat: now - 2 * 24 * 3600,
            exp: now - 24 * 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(verify_token(&token, "secret").is_err());
    }
}

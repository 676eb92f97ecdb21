//! Auth API Handlers

use axum::{
    Json,
    extract::{Extension, State, rejection::JsonRejection},
};
use shared::error::{AppError, AppResult};
use shared::models::{CurrentUser, LoginRequest, LoginResponse, VerifyRequest, VerifyResponse};

use crate::auth::jwt;
use crate::state::AppState;

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            AppError::validation("userId, email and role are required").with_detail("field", field)
        })
}

/// POST /api/auth/login - mint a token for the presented identity
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = CurrentUser {
        user_id: required(payload.user_id, "userId")?,
        email: required(payload.email, "email")?,
        role: required(payload.role, "role")?,
    };

    let token = jwt::create_token(&user, &state.jwt_secret).map_err(|e| {
        tracing::error!("Failed to sign token: {e}");
        AppError::internal("Failed to create token")
    })?;

    tracing::info!(user_id = %user.user_id, role = %user.role, "Login token issued");
    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user_id: user.user_id,
        email: user.email,
        role: user.role,
    }))
}

/// POST /api/auth/verify - `{valid: false}` for anything that does not verify
pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Json<VerifyResponse> {
    let Some(token) = payload.ok().and_then(|Json(req)| req.token) else {
        return Json(VerifyResponse::invalid());
    };
    match jwt::verify_token(token.trim(), &state.jwt_secret) {
        Ok(claims) => Json(VerifyResponse::valid(claims.into())),
        Err(e) => {
            tracing::debug!("Token verification failed: {e}");
            Json(VerifyResponse::invalid())
        }
    }
}

/// GET /api/auth/me - the caller behind the bearer token
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<CurrentUser> {
    Json(user)
}

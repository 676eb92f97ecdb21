//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CartItem, CartItemCreate, CartItemUpdate};
use uuid::Uuid;

use crate::api::or_empty;
use crate::db::{RepoError, cart, product};
use crate::state::AppState;
use crate::utils::validation::validate_quantity;

fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid_request(format!("Invalid user id: {raw}")))
}

/// GET /api/cart - every cart line (admin view)
pub async fn list(State(state): State<AppState>) -> Json<Vec<CartItem>> {
    or_empty("cart items", cart::find_all(&state.pool).await)
}

/// GET /api/cart/user/{user_id}
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<CartItem>> {
    let result = match Uuid::parse_str(&user_id) {
        Ok(user_id) => cart::find_by_user(&state.pool, user_id).await,
        Err(_) => Err(RepoError::Validation(format!("Invalid user id: {user_id}"))),
    };
    or_empty("user cart", result)
}

/// POST /api/cart - add a product, merging with an existing line
pub async fn add(
    State(state): State<AppState>,
    Json(payload): Json<CartItemCreate>,
) -> AppResult<(StatusCode, Json<CartItem>)> {
    validate_quantity(payload.quantity)?;
    if product::find_by_id(&state.pool, payload.product_id)
        .await?
        .is_none()
    {
        return Err(AppError::product_not_found(payload.product_id));
    }

    let item = cart::add(
        &state.pool,
        payload.user_id,
        payload.product_id,
        payload.quantity,
    )
    .await
    .map_err(|e| match e {
        RepoError::Validation(msg) => AppError::with_message(ErrorCode::CartInvalidQuantity, msg),
        other => other.into(),
    })?;
    tracing::debug!(
        user_id = %item.user_id,
        product_id = item.product_id,
        quantity = item.quantity,
        "Cart line added"
    );
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/cart/{id} - set quantity
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CartItemUpdate>,
) -> AppResult<Json<CartItem>> {
    validate_quantity(payload.quantity)?;
    let item = cart::update_quantity(&state.pool, id, payload.quantity)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::cart_item_not_found(id),
            other => other.into(),
        })?;
    Ok(Json(item))
}

/// DELETE /api/cart/{id}
pub async fn remove(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !cart::delete(&state.pool, id).await? {
        return Err(AppError::cart_item_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/cart/user/{user_id} - empty the cart
pub async fn clear(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<StatusCode> {
    let user_id = parse_user_id(&user_id)?;
    let removed = cart::clear(&state.pool, user_id).await?;
    tracing::debug!(user_id = %user_id, removed, "Cart cleared");
    Ok(StatusCode::NO_CONTENT)
}

//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::error::{AppError, AppResult};
use shared::models::{Order, OrderCreate, OrderStatusUpdate};
use uuid::Uuid;

use crate::api::or_empty;
use crate::db::{RepoError, order};
use crate::services::checkout;
use crate::state::AppState;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};

/// GET /api/orders - all orders, newest first
pub async fn list(State(state): State<AppState>) -> Json<Vec<Order>> {
    or_empty("orders", order::find_all(&state.pool).await)
}

/// GET /api/orders/user/{user_id} - one user's orders, newest first
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<Order>> {
    let result = match Uuid::parse_str(&user_id) {
        Ok(user_id) => order::find_by_user(&state.pool, user_id).await,
        Err(_) => Err(RepoError::Validation(format!("Invalid user id: {user_id}"))),
    };
    or_empty("user orders", result)
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::order_not_found(id))?;
    Ok(Json(order))
}

/// POST /api/orders - check out the user's cart
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    validate_required_text(&payload.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_required_text(&payload.customer_phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.shipping_address, "shippingAddress", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let order =
        checkout::place_order(&state.pool, &payload, &shared::util::today_compact()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PATCH /api/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = order::update_status(&state.pool, id, payload.status)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::order_not_found(id),
            other => other.into(),
        })?;
    tracing::info!(order_id = id, status = %order.status, "Order status updated");
    Ok(Json(order))
}

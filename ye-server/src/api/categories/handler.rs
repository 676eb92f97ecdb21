//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::api::or_empty;
use crate::db::{RepoError, category};
use crate::state::AppState;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

fn map_repo_error(id: Option<i64>, err: RepoError) -> AppError {
    match (err, id) {
        (RepoError::Duplicate(msg), _) => AppError::with_message(ErrorCode::CategoryNameExists, msg),
        (RepoError::NotFound(_), Some(id)) => AppError::category_not_found(id),
        (other, _) => other.into(),
    }
}

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> Json<Vec<Category>> {
    or_empty("categories", category::find_all(&state.pool).await)
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::category_not_found(id))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(mut payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    payload.name = payload.name.trim().to_string();

    let category = category::create(&state.pool, payload)
        .await
        .map_err(|e| map_repo_error(None, e))?;
    tracing::info!(category_id = category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id} - rename
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    payload.name = payload.name.trim().to_string();

    let category = category::update(&state.pool, id, payload)
        .await
        .map_err(|e| map_repo_error(Some(id), e))?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - refused while products still reference it
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if category::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::category_not_found(id));
    }
    let products = category::count_products(&state.pool, id).await?;
    if products > 0 {
        return Err(AppError::new(ErrorCode::CategoryHasProducts).with_detail("products", products));
    }
    if !category::delete(&state.pool, id).await? {
        return Err(AppError::category_not_found(id));
    }
    tracing::info!(category_id = id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}

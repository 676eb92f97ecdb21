//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::error::{AppError, AppResult};
use shared::models::{Product, ProductCreate, ProductSearch, ProductUpdate};

use crate::api::or_empty;
use crate::db::product::ProductInput;
use crate::db::{RepoError, category, product};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
    validate_stock,
};

fn validate_input(
    name: &str,
    description: &Option<String>,
    price: rust_decimal::Decimal,
    stock_qty: i32,
) -> AppResult<()> {
    validate_required_text(name, "name", MAX_NAME_LEN)?;
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;
    validate_price(price)?;
    validate_stock(stock_qty)?;
    Ok(())
}

async fn ensure_category(state: &AppState, category_id: Option<i64>) -> AppResult<()> {
    if let Some(id) = category_id
        && category::find_by_id(&state.pool, id).await?.is_none()
    {
        return Err(AppError::category_not_found(id));
    }
    Ok(())
}

/// GET /api/products - all products
pub async fn list(State(state): State<AppState>) -> Json<Vec<Product>> {
    or_empty("products", product::find_all(&state.pool).await)
}

/// GET /api/products/in-stock - products with stock left
pub async fn list_in_stock(State(state): State<AppState>) -> Json<Vec<Product>> {
    or_empty("in-stock products", product::find_in_stock(&state.pool).await)
}

/// GET /api/products/category/{category_id}
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Json<Vec<Product>> {
    or_empty(
        "products by category",
        product::find_by_category(&state.pool, category_id).await,
    )
}

/// GET /api/products/search?q= - case-insensitive name search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<ProductSearch>,
) -> Json<Vec<Product>> {
    or_empty(
        "product search",
        product::search_by_name(&state.pool, params.q.trim()).await,
    )
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let product = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    validate_input(
        &payload.name,
        &payload.description,
        payload.price,
        payload.stock_qty,
    )?;
    let category_id = payload.resolved_category_id();
    ensure_category(&state, category_id).await?;

    let input = ProductInput {
        name: payload.name.trim().to_string(),
        description: payload.description,
        price: payload.price,
        stock_qty: payload.stock_qty,
        category_id,
    };
    let product = product::create(&state.pool, input, payload.created_by).await?;
    tracing::info!(product_id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id} - replace editable fields
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    validate_input(
        &payload.name,
        &payload.description,
        payload.price,
        payload.stock_qty,
    )?;
    let category_id = payload.resolved_category_id();
    ensure_category(&state, category_id).await?;

    let input = ProductInput {
        name: payload.name.trim().to_string(),
        description: payload.description,
        price: payload.price,
        stock_qty: payload.stock_qty,
        category_id,
    };
    let product = product::update(&state.pool, id, input)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => AppError::product_not_found(id),
            other => other.into(),
        })?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !product::delete(&state.pool, id).await? {
        return Err(AppError::product_not_found(id));
    }
    tracing::info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

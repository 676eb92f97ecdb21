//! Repair Request API Handlers
//!
//! Ticket ids are UUIDs; a malformed id is reported the same way as an
//! unknown one.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::error::{AppError, AppResult};
use shared::models::{
    RepairRequest, RepairRequestCreate, RepairRequestUpdate, RepairStatus, RepairStatusUpdate,
};
use uuid::Uuid;

use crate::api::or_empty;
use crate::db::{RepoError, repair_request};
use crate::state::AppState;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_present_text, validate_required_text,
};

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::repair_request_not_found(raw))
}

fn not_found_as(id: Uuid) -> impl FnOnce(RepoError) -> AppError {
    move |e| match e {
        RepoError::NotFound(_) => AppError::repair_request_not_found(id.to_string()),
        other => other.into(),
    }
}

/// GET /api/repair-requests - all tickets, newest first
pub async fn list(State(state): State<AppState>) -> Json<Vec<RepairRequest>> {
    or_empty("repair requests", repair_request::find_all(&state.pool).await)
}

/// GET /api/repair-requests/user/{user_id}
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<RepairRequest>> {
    let result = match Uuid::parse_str(&user_id) {
        Ok(user_id) => repair_request::find_by_user(&state.pool, user_id).await,
        Err(_) => Err(RepoError::Validation(format!("Invalid user id: {user_id}"))),
    };
    or_empty("user repair requests", result)
}

/// GET /api/repair-requests/status/{status}
pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Json<Vec<RepairRequest>> {
    let result = match status.parse::<RepairStatus>() {
        Ok(status) => repair_request::find_by_status(&state.pool, status).await,
        Err(e) => Err(RepoError::Validation(e)),
    };
    or_empty("repair requests by status", result)
}

/// GET /api/repair-requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RepairRequest>> {
    let uuid = parse_id(&id)?;
    let request = repair_request::find_by_id(&state.pool, uuid)
        .await?
        .ok_or_else(|| AppError::repair_request_not_found(id))?;
    Ok(Json(request))
}

/// POST /api/repair-requests - open a ticket in `pending`
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<RepairRequestCreate>,
) -> AppResult<(StatusCode, Json<RepairRequest>)> {
    validate_required_text(&payload.equipment_type, "equipmentType", MAX_NAME_LEN)?;
    validate_required_text(&payload.issue_description, "issueDescription", MAX_NOTE_LEN)?;
    validate_required_text(&payload.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_optional_text(&payload.brand, "brand", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.customer_phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.pickup_address, "pickupAddress", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.preferred_date, "preferredDate", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.preferred_time, "preferredTime", MAX_SHORT_TEXT_LEN)?;

    let request = repair_request::create(&state.pool, payload).await?;
    tracing::info!(
        repair_id = %request.id,
        equipment = %request.equipment_type,
        "Repair request created"
    );
    Ok((StatusCode::CREATED, Json(request)))
}

/// PUT /api/repair-requests/{id} - change the fields that were sent
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RepairRequestUpdate>,
) -> AppResult<Json<RepairRequest>> {
    let uuid = parse_id(&id)?;
    validate_present_text(&payload.equipment_type, "equipmentType", MAX_NAME_LEN)?;
    validate_present_text(&payload.issue_description, "issueDescription", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.brand, "brand", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.pickup_address, "pickupAddress", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.preferred_date, "preferredDate", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.preferred_time, "preferredTime", MAX_SHORT_TEXT_LEN)?;

    let request = repair_request::update(&state.pool, uuid, payload)
        .await
        .map_err(not_found_as(uuid))?;
    Ok(Json(request))
}

/// PATCH /api/repair-requests/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RepairStatusUpdate>,
) -> AppResult<Json<RepairRequest>> {
    let uuid = parse_id(&id)?;
    validate_optional_text(&payload.admin_notes, "adminNotes", MAX_NOTE_LEN)?;

    let request = repair_request::update_status(
        &state.pool,
        uuid,
        payload.status,
        payload.effective_notes(),
        payload.estimated_cost,
    )
    .await
    .map_err(not_found_as(uuid))?;
    tracing::info!(repair_id = %uuid, status = %request.status, "Repair status updated");
    Ok(Json(request))
}

/// DELETE /api/repair-requests/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let uuid = parse_id(&id)?;
    if !repair_request::delete(&state.pool, uuid).await? {
        return Err(AppError::repair_request_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

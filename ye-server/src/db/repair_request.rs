//! Repair Request Repository

use super::{RepoError, RepoResult};
use rust_decimal::Decimal;
use shared::models::{
    RepairRequest, RepairRequestCreate, RepairRequestUpdate, RepairStatus, ServiceType, Urgency,
};
use shared::util::{from_minor_units, to_minor_units};
use sqlx::query::QueryAs;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

const SELECT_REPAIR: &str = "SELECT id, user_id, equipment_type, brand, issue_description, urgency, service_type, pickup_address, preferred_date, preferred_time, customer_name, customer_phone, estimated_cost, status, admin_notes, created_at FROM repair_request";

#[derive(sqlx::FromRow)]
struct RepairRequestRow {
    id: Uuid,
    user_id: Uuid,
    equipment_type: String,
    brand: Option<String>,
    issue_description: String,
    urgency: Urgency,
    service_type: ServiceType,
    pickup_address: Option<String>,
    preferred_date: Option<String>,
    preferred_time: Option<String>,
    customer_name: String,
    customer_phone: Option<String>,
    estimated_cost: Option<i64>,
    status: RepairStatus,
    admin_notes: Option<String>,
    created_at: i64,
}

impl From<RepairRequestRow> for RepairRequest {
    fn from(r: RepairRequestRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            equipment_type: r.equipment_type,
            brand: r.brand,
            issue_description: r.issue_description,
            urgency: r.urgency,
            service_type: r.service_type,
            pickup_address: r.pickup_address,
            preferred_date: r.preferred_date,
            preferred_time: r.preferred_time,
            customer_name: r.customer_name,
            customer_phone: r.customer_phone,
            estimated_cost: r.estimated_cost.map(from_minor_units),
            status: r.status,
            admin_notes: r.admin_notes,
            created_at: r.created_at,
        }
    }
}

fn cost_minor(cost: Option<Decimal>) -> RepoResult<Option<i64>> {
    match cost {
        None => Ok(None),
        Some(c) if c.is_sign_negative() => Err(RepoError::Validation(
            "estimated cost must not be negative".into(),
        )),
        Some(c) => to_minor_units(c)
            .map(Some)
            .ok_or_else(|| RepoError::Validation("estimated cost is out of range".into())),
    }
}

async fn fetch_many<'q>(
    pool: &SqlitePool,
    query: QueryAs<'q, Sqlite, RepairRequestRow, SqliteArguments<'q>>,
) -> RepoResult<Vec<RepairRequest>> {
    let rows = query.fetch_all(pool).await?;
    Ok(rows.into_iter().map(RepairRequest::from).collect())
}

/// All tickets, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<RepairRequest>> {
    let sql = format!("{SELECT_REPAIR} ORDER BY created_at DESC");
    fetch_many(pool, sqlx::query_as(&sql)).await
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> RepoResult<Option<RepairRequest>> {
    let row = sqlx::query_as::<_, RepairRequestRow>(&format!("{SELECT_REPAIR} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(RepairRequest::from))
}

/// A user's tickets, newest first
pub async fn find_by_user(pool: &SqlitePool, user_id: Uuid) -> RepoResult<Vec<RepairRequest>> {
    let sql = format!("{SELECT_REPAIR} WHERE user_id = ? ORDER BY created_at DESC");
    fetch_many(pool, sqlx::query_as(&sql).bind(user_id)).await
}

pub async fn find_by_status(
    pool: &SqlitePool,
    status: RepairStatus,
) -> RepoResult<Vec<RepairRequest>> {
    let sql = format!("{SELECT_REPAIR} WHERE status = ? ORDER BY created_at DESC");
    fetch_many(pool, sqlx::query_as(&sql).bind(status)).await
}

/// New tickets always start out `pending` with a fresh random id
pub async fn create(pool: &SqlitePool, data: RepairRequestCreate) -> RepoResult<RepairRequest> {
    let id = Uuid::new_v4();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO repair_request (id, user_id, equipment_type, brand, issue_description, urgency, service_type, pickup_address, preferred_date, preferred_time, customer_name, customer_phone, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )
    .bind(id)
    .bind(data.user_id)
    .bind(&data.equipment_type)
    .bind(&data.brand)
    .bind(&data.issue_description)
    .bind(data.urgency)
    .bind(data.service_type)
    .bind(&data.pickup_address)
    .bind(&data.preferred_date)
    .bind(&data.preferred_time)
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(RepairStatus::Pending)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create repair request".into()))
}

/// Partial update: only fields present in `data` change
pub async fn update(
    pool: &SqlitePool,
    id: Uuid,
    data: RepairRequestUpdate,
) -> RepoResult<RepairRequest> {
    let estimated_cost = cost_minor(data.estimated_cost)?;
    let rows = sqlx::query(
        "UPDATE repair_request SET equipment_type = COALESCE(?1, equipment_type), brand = COALESCE(?2, brand), issue_description = COALESCE(?3, issue_description), urgency = COALESCE(?4, urgency), service_type = COALESCE(?5, service_type), pickup_address = COALESCE(?6, pickup_address), preferred_date = COALESCE(?7, preferred_date), preferred_time = COALESCE(?8, preferred_time), estimated_cost = COALESCE(?9, estimated_cost) WHERE id = ?10",
    )
    .bind(&data.equipment_type)
    .bind(&data.brand)
    .bind(&data.issue_description)
    .bind(data.urgency)
    .bind(data.service_type)
    .bind(&data.pickup_address)
    .bind(&data.preferred_date)
    .bind(&data.preferred_time)
    .bind(estimated_cost)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Repair request {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Repair request {id} not found")))
}

/// Set the status; notes and cost are only overwritten when provided
pub async fn update_status(
    pool: &SqlitePool,
    id: Uuid,
    status: RepairStatus,
    admin_notes: Option<&str>,
    estimated_cost: Option<Decimal>,
) -> RepoResult<RepairRequest> {
    let estimated_cost = cost_minor(estimated_cost)?;
    let rows = sqlx::query(
        "UPDATE repair_request SET status = ?1, admin_notes = COALESCE(?2, admin_notes), estimated_cost = COALESCE(?3, estimated_cost) WHERE id = ?4",
    )
    .bind(status)
    .bind(admin_notes)
    .bind(estimated_cost)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Repair request {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Repair request {id} not found")))
}

/// Returns `false` when no row matched
pub async fn delete(pool: &SqlitePool, id: Uuid) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM repair_request WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

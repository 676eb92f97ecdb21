//! Repair Request Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Repair ticket lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum RepairStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    InProgress,
    Ready,
    Completed,
    Cancelled,
}

impl RepairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::InProgress => "in_progress",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepairStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "in_progress" => Ok(Self::InProgress),
            "ready" => Ok(Self::Ready),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown repair status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ServiceType {
    Pickup,
    #[default]
    Dropoff,
}

/// Equipment repair ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub equipment_type: String,
    pub brand: Option<String>,
    pub issue_description: String,
    pub urgency: Urgency,
    pub service_type: ServiceType,
    pub pickup_address: Option<String>,
    /// Free-form date as entered by the customer (`yyyy-MM-dd` from the booking form)
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub status: RepairStatus,
    pub admin_notes: Option<String>,
    pub created_at: i64,
}

/// Create repair request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequestCreate {
    pub user_id: Uuid,
    pub equipment_type: String,
    pub brand: Option<String>,
    pub issue_description: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub service_type: ServiceType,
    pub pickup_address: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
}

/// Partial update payload; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequestUpdate {
    pub equipment_type: Option<String>,
    pub brand: Option<String>,
    pub issue_description: Option<String>,
    pub urgency: Option<Urgency>,
    pub service_type: Option<ServiceType>,
    pub pickup_address: Option<String>,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub estimated_cost: Option<Decimal>,
}

/// Admin status change
///
/// `adminNotes` replaces the stored notes only when non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairStatusUpdate {
    pub status: RepairStatus,
    pub admin_notes: Option<String>,
    pub estimated_cost: Option<Decimal>,
}

impl RepairStatusUpdate {
    /// Notes to store, `None` when blank
    pub fn effective_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref().filter(|n| !n.is_empty())
    }
}

//! Professional time-off block models

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::enums::ApprovalStatus;

/// A professional's declared unavailability window. Only approved blocks
/// remove availability; pending ones are advisory until a manager decides.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProfessionalBlock {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub professional_id: Uuid,
    /// Block start (salon-local)
    pub starts_at: NaiveDateTime,
    /// Block end (salon-local)
    pub ends_at: NaiveDateTime,
    pub reason: Option<String>,
    pub requires_approval: bool,
    pub approval_status: ApprovalStatus,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Create block request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlock {
    pub professional_id: Uuid,
    /// Block start (salon-local, RFC 3339 without offset)
    pub starts_at: NaiveDateTime,
    /// Block end (salon-local, RFC 3339 without offset)
    pub ends_at: NaiveDateTime,
    pub reason: Option<String>,
}

/// Query parameters for block listings
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BlockQuery {
    pub professional_id: Option<Uuid>,
    /// Only blocks ending on/after this date (YYYY-MM-DD)
    pub from: Option<String>,
    /// Only blocks starting on/before this date (YYYY-MM-DD)
    pub to: Option<String>,
}

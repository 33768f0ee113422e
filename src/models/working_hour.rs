//! Working-hour models (per-professional weekly open/close intervals)

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One open interval of a professional's week; a day may hold several
/// rows (split shifts), never overlapping.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkingHour {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub professional_id: Uuid,
    /// Day of week (0=Monday, 6=Sunday)
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

/// Create working-hour request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkingHour {
    /// Day of week (0=Monday, 6=Sunday)
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: i16,
    /// Opening time (HH:MM)
    pub start_time: String,
    /// Closing time (HH:MM)
    pub end_time: String,
}

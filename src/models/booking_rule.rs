//! Client booking-rule models (read-only input to the deposit gate)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::BookingRuleType;

/// A restriction attached to a client (by id or by phone): either the
/// client must pay a deposit before confirming, or is blocked from
/// booking online entirely.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookingRule {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub client_id: Option<Uuid>,
    pub client_phone: Option<String>,
    pub rule_type: BookingRuleType,
    pub reason: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

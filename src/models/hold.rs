//! Slot-hold models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::HoldStatus;

/// Time-bounded exclusive claim on a slot, bridging slot selection and
/// appointment confirmation during online checkout.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Hold {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub professional_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    /// Opaque identifier of the booking client (hashed IP/user-agent)
    pub client_fingerprint: String,
    pub client_id: Option<Uuid>,
    pub client_phone: Option<String>,
    pub service_id: Option<Uuid>,
    pub status: HoldStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Hold {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Acquire-hold request (online booking)
#[derive(Debug, Deserialize, ToSchema)]
pub struct AcquireHold {
    pub professional_id: Uuid,
    pub service_id: Uuid,
    /// Slot date (YYYY-MM-DD)
    pub date: String,
    /// Slot start time (HH:MM)
    pub start_time: String,
    /// Known client making the booking, if any
    pub client_id: Option<Uuid>,
    /// Client phone, used for booking-rule matching
    pub client_phone: Option<String>,
    /// Browser-supplied fingerprint; the server derives one from the
    /// request when absent
    pub client_fingerprint: Option<String>,
    /// Override of the default hold TTL, capped by the server
    pub ttl_seconds: Option<i64>,
}

/// Extend-hold request (while a payment is in flight)
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExtendHold {
    pub additional_seconds: i64,
}

/// Confirm-hold request: consumes the hold into an appointment
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmHold {
    /// Required unless the hold already carries a client
    pub client_id: Option<Uuid>,
    pub notes: Option<String>,
}

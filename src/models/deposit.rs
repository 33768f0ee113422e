//! Deposit models (pre-payment gating online bookings)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::DepositStatus;

/// A pre-payment required before a gated booking is confirmed. Linked to
/// the hold it protects and, once consumed, to the resulting appointment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Deposit {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub hold_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub amount: Decimal,
    /// Gateway reference used to correlate webhook callbacks
    pub payment_ref: String,
    pub status: DepositStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Gateway webhook payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentWebhook {
    pub payment_ref: String,
    /// Gateway-side outcome: "paid", "expired", "failed" or "cancelled"
    pub status: String,
}

//! Shared domain enums, mapped onto Postgres enum types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// AppointmentStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Started,
    Completed,
    NoShow,
    Cancelled,
}

impl AppointmentStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::NoShow | AppointmentStatus::Cancelled
        )
    }

    /// States that occupy the professional's agenda
    pub fn occupies_slot(self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::NoShow)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Started => "started",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::NoShow => "no_show",
            AppointmentStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

impl sqlx::postgres::PgHasArrayType for AppointmentStatus {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_appointment_status")
    }
}

// ---------------------------------------------------------------------------
// HoldStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a slot hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "hold_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HoldStatus {
    Active,
    Consumed,
    Released,
    Expired,
}

impl std::fmt::Display for HoldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            HoldStatus::Active => "active",
            HoldStatus::Consumed => "consumed",
            HoldStatus::Released => "released",
            HoldStatus::Expired => "expired",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ApprovalStatus
// ---------------------------------------------------------------------------

/// Approval state of a professional's time-off block
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "approval_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

// ---------------------------------------------------------------------------
// DepositStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "deposit_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    Pending,
    Paid,
    Refunded,
    Expired,
}

// ---------------------------------------------------------------------------
// BookingRuleType
// ---------------------------------------------------------------------------

/// Client-specific booking restrictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "booking_rule_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingRuleType {
    DepositRequired,
    Blocked,
}

// ---------------------------------------------------------------------------
// CreatedVia
// ---------------------------------------------------------------------------

/// Which surface created an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "created_via", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CreatedVia {
    Staff,
    Online,
}

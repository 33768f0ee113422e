//! Appointment models

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{AppointmentStatus, CreatedVia};

/// A durable booking. Owns [start_time, start_time + duration) on the
/// professional's agenda while its status occupies the slot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub salon_id: Uuid,
    pub professional_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: AppointmentStatus,
    pub created_via: CreatedVia,
    /// Set when this appointment replaced another one
    pub reschedule_of: Option<Uuid>,
    /// Short code the client presents at the desk
    pub confirmation_code: String,
    pub cancel_reason: Option<String>,
    pub cancelled_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Scheduled start as a salon-local instant
    pub fn starts_at(&self) -> NaiveDateTime {
        NaiveDateTime::new(self.date, self.start_time)
    }
}

/// Create appointment request (staff direct path)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAppointment {
    pub professional_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    /// Appointment date (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM)
    pub start_time: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Cancel request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelAppointment {
    pub reason: Option<String>,
}

/// Reschedule request; a new appointment is created and the original is
/// cancelled, never edited in place.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RescheduleAppointment {
    /// New date (YYYY-MM-DD)
    pub date: String,
    /// New start time (HH:MM)
    pub start_time: String,
    /// Move to another professional (defaults to the original one)
    pub professional_id: Option<Uuid>,
}

/// Query parameters for appointment listings
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AppointmentQuery {
    pub professional_id: Option<Uuid>,
    /// Filter by date (YYYY-MM-DD)
    pub date: Option<String>,
}

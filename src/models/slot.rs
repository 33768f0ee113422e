//! Availability output models

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// A bookable candidate interval for a service of a given duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FreeSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// First day with at least one free slot, found by the forward scan
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NextAvailability {
    pub professional_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<FreeSlot>,
}

/// Query parameters for the free-slot listing
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct FreeSlotQuery {
    pub professional_id: Uuid,
    pub service_id: Uuid,
    /// Day to inspect (YYYY-MM-DD)
    pub date: String,
}

/// Query parameters for the next-availability scan
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct NextAvailabilityQuery {
    pub service_id: Uuid,
    /// Restrict the scan to one professional
    pub professional_id: Option<Uuid>,
}

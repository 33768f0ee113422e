//! Availability endpoints (free slots, next-available scan)

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::slot::{FreeSlotQuery, NextAvailability, NextAvailabilityQuery},
    models::FreeSlot,
    services::parse_date,
};

use super::SalonContext;

/// Free slots for a professional, service and day
#[utoipa::path(
    get,
    path = "/availability/slots",
    tag = "availability",
    params(FreeSlotQuery),
    responses(
        (status = 200, description = "Bookable slot candidates in chronological order", body = Vec<FreeSlot>),
        (status = 404, description = "Professional or service not found")
    )
)]
pub async fn free_slots(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Query(query): Query<FreeSlotQuery>,
) -> AppResult<Json<Vec<FreeSlot>>> {
    let date = parse_date(&query.date)?;
    let slots = state
        .services
        .availability
        .free_slots_for_service(ctx.salon_id, query.professional_id, query.service_id, date)
        .await?;
    Ok(Json(slots))
}

/// First day with availability for a service, scanning forward
#[utoipa::path(
    get,
    path = "/availability/next",
    tag = "availability",
    params(NextAvailabilityQuery),
    responses(
        (status = 200, description = "First day with free slots", body = NextAvailability),
        (status = 404, description = "No availability within the scan horizon")
    )
)]
pub async fn next_available(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Query(query): Query<NextAvailabilityQuery>,
) -> AppResult<Json<NextAvailability>> {
    let next = state
        .services
        .availability
        .next_available(ctx.salon_id, query.service_id, query.professional_id)
        .await?;
    Ok(Json(next))
}

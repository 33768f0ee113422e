//! Appointment endpoints: staff creation and lifecycle transitions

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::{
            AppointmentQuery, CancelAppointment, CreateAppointment, RescheduleAppointment,
        },
        Appointment,
    },
    services::parse_date,
};

use super::SalonContext;

/// Reschedule response: the cancelled original and its replacement
#[derive(Serialize, ToSchema)]
pub struct RescheduleResponse {
    pub cancelled: Appointment,
    pub replacement: Appointment,
}

/// List appointments
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "appointments",
    params(AppointmentQuery),
    responses(
        (status = 200, description = "Appointments", body = Vec<Appointment>)
    )
)]
pub async fn list(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    ctx.require_staff()?;
    let date = query.date.as_deref().map(parse_date).transpose()?;
    let appointments = state
        .services
        .appointments
        .list(ctx.salon_id, query.professional_id, date)
        .await?;
    Ok(Json(appointments))
}

/// Get one appointment
#[utoipa::path(
    get,
    path = "/appointments/{id}",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    ctx.require_staff()?;
    let appointment = state.services.appointments.get(id).await?;
    Ok(Json(appointment))
}

/// Create an appointment directly (staff path). Runs the same overlap
/// check as the hold path inside the insert transaction.
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "appointments",
    request_body = CreateAppointment,
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 404, description = "Professional, client or service not found"),
        (status = 409, description = "Slot already held or booked")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Json(request): Json<CreateAppointment>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    ctx.require_staff()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let appointment = state
        .services
        .appointments
        .create_staff(ctx.salon_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Confirm a scheduled appointment
#[utoipa::path(
    post,
    path = "/appointments/{id}/confirm",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment confirmed", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Not in a confirmable state")
    )
)]
pub async fn confirm(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    ctx.require_staff()?;
    let appointment = state.services.appointments.confirm(id).await?;
    Ok(Json(appointment))
}

/// Mark the service as started
#[utoipa::path(
    post,
    path = "/appointments/{id}/start",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment started", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Not in a startable state")
    )
)]
pub async fn start(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    ctx.require_staff()?;
    let appointment = state.services.appointments.start(id).await?;
    Ok(Json(appointment))
}

/// Mark the service as completed
#[utoipa::path(
    post,
    path = "/appointments/{id}/complete",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment completed", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Only started appointments can complete")
    )
)]
pub async fn complete(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    ctx.require_staff()?;
    let appointment = state.services.appointments.complete(id).await?;
    Ok(Json(appointment))
}

/// Record a no-show; only possible after the scheduled start has passed
#[utoipa::path(
    post,
    path = "/appointments/{id}/no-show",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "No-show recorded", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Too early or not in a no-showable state")
    )
)]
pub async fn no_show(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Appointment>> {
    ctx.require_staff()?;
    let appointment = state.services.appointments.no_show(id).await?;
    Ok(Json(appointment))
}

/// Cancel an appointment
#[utoipa::path(
    post,
    path = "/appointments/{id}/cancel",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = CancelAppointment,
    responses(
        (status = 200, description = "Appointment cancelled", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Already in a terminal state")
    )
)]
pub async fn cancel(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelAppointment>,
) -> AppResult<Json<Appointment>> {
    ctx.require_staff()?;
    let appointment = state
        .services
        .appointments
        .cancel(id, request.reason, ctx.actor_label())
        .await?;
    Ok(Json(appointment))
}

/// Reschedule: cancel + recreate with a traceable link
#[utoipa::path(
    post,
    path = "/appointments/{id}/reschedule",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = RescheduleAppointment,
    responses(
        (status = 201, description = "Appointment rescheduled", body = RescheduleResponse),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "New slot already held or booked"),
        (status = 422, description = "Not in a reschedulable state")
    )
)]
pub async fn reschedule(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
    Json(request): Json<RescheduleAppointment>,
) -> AppResult<(StatusCode, Json<RescheduleResponse>)> {
    ctx.require_staff()?;
    let (cancelled, replacement) = state
        .services
        .appointments
        .reschedule(id, &request, ctx.actor_label())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RescheduleResponse { cancelled, replacement }),
    ))
}

//! Hold endpoints: the online-booking reservation surface

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        hold::{AcquireHold, ConfirmHold, ExtendHold},
        Appointment, Deposit, Hold,
    },
};

use super::{request_fingerprint, SalonContext};

/// Acquire response; carries deposit payment details when the client is
/// deposit-gated
#[derive(Serialize, ToSchema)]
pub struct HoldResponse {
    pub hold: Hold,
    pub deposit: Option<Deposit>,
    pub message: String,
}

/// Cleanup response
#[derive(Serialize, ToSchema)]
pub struct CleanupResponse {
    /// Number of holds transitioned to expired
    pub expired: u64,
}

/// Acquire a hold on a slot
#[utoipa::path(
    post,
    path = "/holds",
    tag = "holds",
    request_body = AcquireHold,
    responses(
        (status = 201, description = "Hold acquired", body = HoldResponse),
        (status = 403, description = "Client is blocked from online booking"),
        (status = 404, description = "Professional or service not found"),
        (status = 409, description = "Slot already held or booked")
    )
)]
pub async fn acquire(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    headers: HeaderMap,
    Json(request): Json<AcquireHold>,
) -> AppResult<(StatusCode, Json<HoldResponse>)> {
    let fingerprint = request
        .client_fingerprint
        .clone()
        .unwrap_or_else(|| request_fingerprint(&headers));

    let (hold, deposit) = state
        .services
        .holds
        .acquire(ctx.salon_id, &request, fingerprint)
        .await?;

    let message = match &deposit {
        Some(d) => format!("Slot held; a deposit of {} is required to confirm", d.amount),
        None => "Slot held".to_string(),
    };
    Ok((
        StatusCode::CREATED,
        Json(HoldResponse { hold, deposit, message }),
    ))
}

/// Extend a live hold's TTL
#[utoipa::path(
    post,
    path = "/holds/{id}/extend",
    tag = "holds",
    params(("id" = Uuid, Path, description = "Hold ID")),
    request_body = ExtendHold,
    responses(
        (status = 200, description = "Hold extended", body = Hold),
        (status = 404, description = "Hold not found or no longer active")
    )
)]
pub async fn extend(
    State(state): State<crate::AppState>,
    _ctx: SalonContext,
    Path(id): Path<Uuid>,
    Json(request): Json<ExtendHold>,
) -> AppResult<Json<Hold>> {
    let hold = state
        .services
        .holds
        .extend(id, request.additional_seconds)
        .await?;
    Ok(Json(hold))
}

/// Confirm a hold into an appointment (non-deposit path)
#[utoipa::path(
    post,
    path = "/holds/{id}/confirm",
    tag = "holds",
    params(("id" = Uuid, Path, description = "Hold ID")),
    request_body = ConfirmHold,
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 402, description = "Deposit required and not paid"),
        (status = 404, description = "Hold not found"),
        (status = 409, description = "Hold already consumed"),
        (status = 410, description = "Hold expired or released")
    )
)]
pub async fn confirm(
    State(state): State<crate::AppState>,
    _ctx: SalonContext,
    Path(id): Path<Uuid>,
    Json(request): Json<ConfirmHold>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let appointment = state
        .services
        .appointments
        .create_from_hold(id, request.client_id, request.notes)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Release a hold (client navigated away); idempotent
#[utoipa::path(
    delete,
    path = "/holds/{id}",
    tag = "holds",
    params(("id" = Uuid, Path, description = "Hold ID")),
    responses(
        (status = 204, description = "Hold released"),
        (status = 404, description = "Hold not found"),
        (status = 409, description = "Hold was already consumed")
    )
)]
pub async fn release(
    State(state): State<crate::AppState>,
    _ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.holds.release(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Expire overrun holds now. Also runs on a schedule; correctness never
/// depends on it.
#[utoipa::path(
    post,
    path = "/holds/cleanup",
    tag = "holds",
    responses(
        (status = 200, description = "Sweep finished", body = CleanupResponse)
    )
)]
pub async fn cleanup(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
) -> AppResult<Json<CleanupResponse>> {
    ctx.require_staff()?;
    let expired = state.services.holds.expire_sweep().await?;
    Ok(Json(CleanupResponse { expired }))
}

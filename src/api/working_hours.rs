//! Working-hour endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{working_hour::CreateWorkingHour, WorkingHour},
};

use super::SalonContext;

/// List a professional's weekly working hours
#[utoipa::path(
    get,
    path = "/professionals/{id}/working-hours",
    tag = "working-hours",
    params(("id" = Uuid, Path, description = "Professional ID")),
    responses(
        (status = 200, description = "Working hours", body = Vec<WorkingHour>),
        (status = 404, description = "Professional not found")
    )
)]
pub async fn list(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(professional_id): Path<Uuid>,
) -> AppResult<Json<Vec<WorkingHour>>> {
    ctx.require_staff()?;
    let hours = state
        .services
        .schedule
        .list_working_hours(ctx.salon_id, professional_id)
        .await?;
    Ok(Json(hours))
}

/// Add one open interval to a professional's week
#[utoipa::path(
    post,
    path = "/professionals/{id}/working-hours",
    tag = "working-hours",
    params(("id" = Uuid, Path, description = "Professional ID")),
    request_body = CreateWorkingHour,
    responses(
        (status = 201, description = "Working hour created", body = WorkingHour),
        (status = 400, description = "Invalid or overlapping interval"),
        (status = 404, description = "Professional not found")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(professional_id): Path<Uuid>,
    Json(request): Json<CreateWorkingHour>,
) -> AppResult<(StatusCode, Json<WorkingHour>)> {
    ctx.require_manager()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state
        .services
        .schedule
        .create_working_hour(ctx.salon_id, professional_id, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete one working-hour interval
#[utoipa::path(
    delete,
    path = "/working-hours/{id}",
    tag = "working-hours",
    params(("id" = Uuid, Path, description = "Working hour ID")),
    responses(
        (status = 204, description = "Working hour deleted"),
        (status = 404, description = "Working hour not found")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ctx.require_manager()?;
    state.services.schedule.delete_working_hour(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

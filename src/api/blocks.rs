//! Professional-block endpoints (time off and its approval flow)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        block::{BlockQuery, CreateBlock},
        enums::ApprovalStatus,
        Appointment, ProfessionalBlock,
    },
    repository::blocks::NewBlock,
    services::parse_date,
};

use super::{ActorRole, SalonContext};

/// Approval response; lists the appointments the block collides with so
/// staff can follow up (approval never auto-cancels them)
#[derive(Serialize, ToSchema)]
pub struct BlockDecisionResponse {
    pub block: ProfessionalBlock,
    pub conflicting_appointments: Vec<Appointment>,
}

/// List blocks
#[utoipa::path(
    get,
    path = "/blocks",
    tag = "blocks",
    params(BlockQuery),
    responses(
        (status = 200, description = "Blocks", body = Vec<ProfessionalBlock>)
    )
)]
pub async fn list(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Query(query): Query<BlockQuery>,
) -> AppResult<Json<Vec<ProfessionalBlock>>> {
    ctx.require_staff()?;
    let from = query.from.as_deref().map(parse_date).transpose()?;
    let to = query.to.as_deref().map(parse_date).transpose()?;
    let blocks = state
        .services
        .schedule
        .list_blocks(ctx.salon_id, query.professional_id, from, to)
        .await?;
    Ok(Json(blocks))
}

/// Create a block. Manager-created blocks are approved immediately;
/// stylist-requested ones wait for a manager's decision and do not
/// restrict availability until approved.
#[utoipa::path(
    post,
    path = "/blocks",
    tag = "blocks",
    request_body = CreateBlock,
    responses(
        (status = 201, description = "Block created", body = ProfessionalBlock),
        (status = 403, description = "Stylists may only block their own agenda")
    )
)]
pub async fn create(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Json(request): Json<CreateBlock>,
) -> AppResult<(StatusCode, Json<ProfessionalBlock>)> {
    ctx.require_staff()?;
    if ctx.role == ActorRole::Stylist && ctx.actor_id != Some(request.professional_id) {
        return Err(AppError::Forbidden(
            "Stylists may only block their own agenda".to_string(),
        ));
    }

    let auto_approved = ctx.is_manager();
    let block = NewBlock {
        salon_id: ctx.salon_id,
        professional_id: request.professional_id,
        starts_at: request.starts_at,
        ends_at: request.ends_at,
        reason: request.reason,
        requires_approval: !auto_approved,
        approval_status: if auto_approved {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Pending
        },
        created_by: ctx.actor_id,
    };
    let created = state.services.schedule.create_block(&block).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Approve a pending block
#[utoipa::path(
    post,
    path = "/blocks/{id}/approve",
    tag = "blocks",
    params(("id" = Uuid, Path, description = "Block ID")),
    responses(
        (status = 200, description = "Block approved", body = BlockDecisionResponse),
        (status = 404, description = "Block not found"),
        (status = 422, description = "Block was already decided")
    )
)]
pub async fn approve(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BlockDecisionResponse>> {
    ctx.require_manager()?;
    let (block, conflicting_appointments) = state.services.schedule.approve_block(id).await?;
    Ok(Json(BlockDecisionResponse { block, conflicting_appointments }))
}

/// Reject a pending block
#[utoipa::path(
    post,
    path = "/blocks/{id}/reject",
    tag = "blocks",
    params(("id" = Uuid, Path, description = "Block ID")),
    responses(
        (status = 200, description = "Block rejected", body = ProfessionalBlock),
        (status = 404, description = "Block not found"),
        (status = 422, description = "Block was already decided")
    )
)]
pub async fn reject(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProfessionalBlock>> {
    ctx.require_manager()?;
    let block = state.services.schedule.reject_block(id).await?;
    Ok(Json(block))
}

/// Delete a block
#[utoipa::path(
    delete,
    path = "/blocks/{id}",
    tag = "blocks",
    params(("id" = Uuid, Path, description = "Block ID")),
    responses(
        (status = 204, description = "Block deleted"),
        (status = 404, description = "Block not found")
    )
)]
pub async fn delete(
    State(state): State<crate::AppState>,
    ctx: SalonContext,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ctx.require_manager()?;
    state.services.schedule.delete_block(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

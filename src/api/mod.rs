//! API handlers for Navalha REST endpoints

pub mod appointments;
pub mod availability;
pub mod blocks;
pub mod health;
pub mod holds;
pub mod openapi;
pub mod payments;
pub mod working_hours;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Who the upstream gateway says is calling. Authentication and
/// authorization happen upstream; these headers arrive already verified
/// and the handlers only do coarse role checks before invoking the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Owner,
    Manager,
    Stylist,
    Public,
}

/// Extractor for the salon/actor identity forwarded by the gateway
pub struct SalonContext {
    pub salon_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub role: ActorRole,
}

impl SalonContext {
    pub fn is_manager(&self) -> bool {
        matches!(self.role, ActorRole::Owner | ActorRole::Manager)
    }

    pub fn require_manager(&self) -> AppResult<()> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "This operation requires a manager or owner".to_string(),
            ))
        }
    }

    pub fn require_staff(&self) -> AppResult<()> {
        match self.role {
            ActorRole::Owner | ActorRole::Manager | ActorRole::Stylist => Ok(()),
            ActorRole::Public => Err(AppError::Forbidden(
                "This operation requires a staff member".to_string(),
            )),
        }
    }

    /// Actor identity recorded on cancellations
    pub fn actor_label(&self) -> Option<String> {
        self.actor_id.map(|id| id.to_string())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SalonContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let salon_id = parts
            .headers
            .get("x-salon-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Validation("Missing X-Salon-Id header".to_string()))?;
        let salon_id = Uuid::parse_str(salon_id)
            .map_err(|_| AppError::Validation("Invalid X-Salon-Id header".to_string()))?;

        let actor_id = parts
            .headers
            .get("x-actor-id")
            .and_then(|value| value.to_str().ok())
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| AppError::Validation("Invalid X-Actor-Id header".to_string()))?;

        let role = match parts
            .headers
            .get("x-actor-role")
            .and_then(|value| value.to_str().ok())
        {
            Some("owner") => ActorRole::Owner,
            Some("manager") => ActorRole::Manager,
            Some("stylist") => ActorRole::Stylist,
            _ => ActorRole::Public,
        };

        Ok(SalonContext { salon_id, actor_id, role })
    }
}

/// Stable fingerprint for anonymous online bookers, derived from the
/// forwarded address and user agent
pub(crate) fn request_fingerprint(headers: &HeaderMap) -> String {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hasher.update(b"|");
    hasher.update(agent.as_bytes());
    hex::encode(hasher.finalize())
}

//! Hold manager: short-lived exclusive claims bridging slot selection
//! and appointment confirmation.

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use crate::{
    clock::Clock,
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{hold::AcquireHold, Deposit, Hold},
    repository::{holds::NewHold, Repository},
    services::{deposits::DepositsService, parse_date, parse_time},
};

/// Floor for caller-supplied TTLs; anything shorter is indistinguishable
/// from not holding at all
const MIN_TTL_SECONDS: i64 = 30;

#[derive(Clone)]
pub struct HoldsService {
    repository: Repository,
    deposits: DepositsService,
    clock: Arc<dyn Clock>,
    booking: BookingConfig,
}

impl HoldsService {
    pub fn new(
        repository: Repository,
        deposits: DepositsService,
        clock: Arc<dyn Clock>,
        booking: BookingConfig,
    ) -> Self {
        Self { repository, deposits, clock, booking }
    }

    /// Get hold by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Hold> {
        self.repository.holds.get(id).await
    }

    /// Acquire a hold on a slot for an online booker. Blocked clients are
    /// rejected before touching the agenda; deposit-gated clients get a
    /// pending deposit and a stretched TTL covering the payment window.
    pub async fn acquire(
        &self,
        salon_id: Uuid,
        req: &AcquireHold,
        fingerprint: String,
    ) -> AppResult<(Hold, Option<Deposit>)> {
        let date = parse_date(&req.date)?;
        let start_time = parse_time(&req.start_time)?;

        let service = self
            .repository
            .catalog
            .get_service(salon_id, req.service_id)
            .await?;
        if !service.active {
            return Err(AppError::Validation("Service is not active".to_string()));
        }
        self.repository
            .catalog
            .get_professional(salon_id, req.professional_id)
            .await?;
        if let Some(client_id) = req.client_id {
            self.repository.catalog.get_client(salon_id, client_id).await?;
        }

        let gate = self
            .deposits
            .gate_for(salon_id, req.client_id, req.client_phone.as_deref())
            .await?;
        if let Some(reason) = gate.blocked_reason {
            return Err(AppError::ClientBlocked(reason));
        }
        if gate.deposit_amount.is_some() && req.client_id.is_none() {
            return Err(AppError::Validation(
                "A client_id is required for deposit-gated bookings".to_string(),
            ));
        }

        let now = self.clock.now_utc();
        let ttl = req
            .ttl_seconds
            .unwrap_or(self.booking.hold_ttl_seconds)
            .min(self.booking.hold_ttl_seconds)
            .max(MIN_TTL_SECONDS);

        let new_hold = NewHold {
            salon_id,
            professional_id: req.professional_id,
            date,
            start_time,
            duration_minutes: service.duration_minutes,
            client_fingerprint: fingerprint,
            client_id: req.client_id,
            client_phone: req.client_phone.clone(),
            service_id: Some(req.service_id),
            expires_at: now + Duration::seconds(ttl),
        };
        let hold = self.repository.holds.acquire(&new_hold, now).await?;
        tracing::info!(
            hold_id = %hold.id,
            professional_id = %hold.professional_id,
            date = %hold.date,
            start_time = %hold.start_time,
            "hold acquired"
        );

        match gate.deposit_amount {
            Some(amount) => match self.deposits.start_deposit(&hold, amount).await {
                Ok((deposit, extended)) => Ok((extended, Some(deposit))),
                Err(e) => {
                    // Do not leave the slot claimed if the gateway failed
                    if let Err(release_err) = self.repository.holds.release(hold.id).await {
                        tracing::warn!(hold_id = %hold.id, error = %release_err, "failed to release hold after deposit setup error");
                    }
                    Err(e)
                }
            },
            None => Ok((hold, None)),
        }
    }

    /// Push a live hold's expiry out, e.g. while a payment is in flight
    pub async fn extend(&self, id: Uuid, additional_seconds: i64) -> AppResult<Hold> {
        if additional_seconds <= 0 {
            return Err(AppError::Validation(
                "additional_seconds must be positive".to_string(),
            ));
        }
        let capped = additional_seconds.min(self.booking.deposit_hold_ttl_seconds);
        self.repository
            .holds
            .extend(id, capped, self.clock.now_utc())
            .await
    }

    /// Give the slot back; idempotent
    pub async fn release(&self, id: Uuid) -> AppResult<Hold> {
        self.repository.holds.release(id).await
    }

    /// Expire overrun holds (and their pending deposits)
    pub async fn expire_sweep(&self) -> AppResult<u64> {
        self.repository.holds.expire_sweep(self.clock.now_utc()).await
    }
}

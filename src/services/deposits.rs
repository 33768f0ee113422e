//! Deposit gate: client-specific rules deciding whether a booking needs
//! a pre-payment, and the deposit lifecycle around a hold.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    clock::Clock,
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{
        deposit::PaymentWebhook,
        enums::{BookingRuleType, DepositStatus},
        Deposit, Hold,
    },
    repository::Repository,
    services::payments::PaymentGateway,
};

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid regex"));

/// Phones arrive in every imaginable format; rules match on digits only
pub(crate) fn normalize_phone(raw: &str) -> String {
    NON_DIGITS.replace_all(raw, "").into_owned()
}

/// What the rules say about one client
#[derive(Debug, Clone)]
pub struct GateDecision {
    pub blocked_reason: Option<String>,
    pub deposit_amount: Option<Decimal>,
}

/// Outcome of a gateway webhook
pub enum WebhookOutcome {
    /// Deposit is paid; the booking may be finalized
    Paid(Deposit),
    /// Deposit closed without payment (expired/failed/cancelled)
    Closed(Deposit),
}

#[derive(Clone)]
pub struct DepositsService {
    repository: Repository,
    gateway: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
    booking: BookingConfig,
}

impl DepositsService {
    pub fn new(
        repository: Repository,
        gateway: Arc<dyn PaymentGateway>,
        clock: Arc<dyn Clock>,
        booking: BookingConfig,
    ) -> Self {
        Self { repository, gateway, clock, booking }
    }

    /// Deposit by gateway reference
    pub async fn get_by_payment_ref(&self, payment_ref: &str) -> AppResult<Deposit> {
        self.repository.deposits.get_by_payment_ref(payment_ref).await
    }

    /// Consult the booking rules for a client (by id and/or phone)
    pub async fn gate_for(
        &self,
        salon_id: Uuid,
        client_id: Option<Uuid>,
        client_phone: Option<&str>,
    ) -> AppResult<GateDecision> {
        let phone_digits = client_phone.map(normalize_phone).filter(|p| !p.is_empty());
        let rules = self
            .repository
            .booking_rules
            .active_for_client(salon_id, client_id, phone_digits.as_deref())
            .await?;

        let blocked_reason = rules
            .iter()
            .find(|r| r.rule_type == BookingRuleType::Blocked)
            .map(|r| {
                r.reason
                    .clone()
                    .unwrap_or_else(|| "Client is blocked from online booking".to_string())
            });
        let deposit_amount = rules
            .iter()
            .any(|r| r.rule_type == BookingRuleType::DepositRequired)
            .then_some(self.booking.deposit_amount);

        Ok(GateDecision { blocked_reason, deposit_amount })
    }

    /// Open a pending deposit for a freshly acquired hold and stretch the
    /// hold's TTL to the payment window. The agenda lock is NOT held
    /// here; the TTL is what protects the slot while payment runs.
    pub async fn start_deposit(&self, hold: &Hold, amount: Decimal) -> AppResult<(Deposit, Hold)> {
        let payment_ref = self.gateway.create_deposit(amount, hold.id).await?;
        let deposit = self
            .repository
            .deposits
            .create(hold.salon_id, hold.id, amount, &payment_ref)
            .await?;

        let now = self.clock.now_utc();
        let extended = self
            .repository
            .holds
            .extend(hold.id, self.booking.deposit_hold_ttl_seconds, now)
            .await?;

        Ok((deposit, extended))
    }

    /// React to the gateway's verdict. Retried webhooks are tolerated;
    /// a payment confirmed after the hold expired surfaces as
    /// HoldExpired so the operator can refund.
    pub async fn apply_webhook(&self, payload: &PaymentWebhook) -> AppResult<WebhookOutcome> {
        let now = self.clock.now_utc();
        match payload.status.as_str() {
            "paid" => {
                let settled = self
                    .repository
                    .deposits
                    .settle(&payload.payment_ref, DepositStatus::Pending, DepositStatus::Paid, Some(now))
                    .await?;
                match settled {
                    Some(deposit) => Ok(WebhookOutcome::Paid(deposit)),
                    None => {
                        let current = self
                            .repository
                            .deposits
                            .get_by_payment_ref(&payload.payment_ref)
                            .await?;
                        match current.status {
                            // Gateway retry; the caller skips finalization
                            // when an appointment already exists
                            DepositStatus::Paid => Ok(WebhookOutcome::Paid(current)),
                            DepositStatus::Expired => Err(AppError::HoldExpired(
                                "Payment confirmed after the hold expired; deposit must be refunded"
                                    .to_string(),
                            )),
                            DepositStatus::Refunded => Err(AppError::InvalidTransition(
                                "Deposit was already refunded".to_string(),
                            )),
                            DepositStatus::Pending => Err(AppError::Internal(
                                "Deposit settle raced and left a pending row".to_string(),
                            )),
                        }
                    }
                }
            }
            "expired" | "failed" | "cancelled" => {
                let settled = self
                    .repository
                    .deposits
                    .settle(&payload.payment_ref, DepositStatus::Pending, DepositStatus::Expired, None)
                    .await?;
                match settled {
                    Some(deposit) => {
                        // Free the slot right away instead of waiting out
                        // the extended TTL
                        if let Err(e) = self.repository.holds.release(deposit.hold_id).await {
                            tracing::warn!(hold_id = %deposit.hold_id, error = %e, "failed to release hold after deposit closed");
                        }
                        Ok(WebhookOutcome::Closed(deposit))
                    }
                    None => {
                        let current = self
                            .repository
                            .deposits
                            .get_by_payment_ref(&payload.payment_ref)
                            .await?;
                        Ok(WebhookOutcome::Closed(current))
                    }
                }
            }
            other => Err(AppError::Validation(format!(
                "Unknown payment status '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_phone_strips_everything_but_digits() {
        assert_eq!(normalize_phone("+55 (11) 98765-4321"), "5511987654321");
        assert_eq!(normalize_phone("11 9.8765 4321"), "11987654321");
        assert_eq!(normalize_phone("no digits"), "");
    }
}

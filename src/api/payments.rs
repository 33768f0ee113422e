//! Payment gateway webhook

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{deposit::PaymentWebhook, Deposit},
    services::deposits::WebhookOutcome,
};

/// Webhook response
#[derive(Serialize, ToSchema)]
pub struct WebhookResponse {
    pub deposit: Deposit,
    pub message: String,
}

/// Gateway callback. A PAID verdict finalizes the gated booking by
/// consuming its hold; anything else closes the deposit and frees the
/// slot. Retries are tolerated.
#[utoipa::path(
    post,
    path = "/payments/webhook",
    tag = "payments",
    request_body = PaymentWebhook,
    responses(
        (status = 200, description = "Webhook processed", body = WebhookResponse),
        (status = 404, description = "Unknown payment reference"),
        (status = 410, description = "Payment confirmed after the hold expired")
    )
)]
pub async fn webhook(
    State(state): State<crate::AppState>,
    Json(payload): Json<PaymentWebhook>,
) -> AppResult<Json<WebhookResponse>> {
    match state.services.deposits.apply_webhook(&payload).await? {
        WebhookOutcome::Paid(deposit) if deposit.appointment_id.is_none() => {
            let appointment = state
                .services
                .appointments
                .finalize_deposit_booking(&deposit)
                .await?;
            let deposit = state
                .services
                .deposits
                .get_by_payment_ref(&payload.payment_ref)
                .await?;
            Ok(Json(WebhookResponse {
                deposit,
                message: format!("Deposit paid; appointment {} created", appointment.id),
            }))
        }
        WebhookOutcome::Paid(deposit) => Ok(Json(WebhookResponse {
            deposit,
            message: "Deposit already settled".to_string(),
        })),
        WebhookOutcome::Closed(deposit) => Ok(Json(WebhookResponse {
            deposit,
            message: "Deposit closed without payment; slot released".to_string(),
        })),
    }
}

//! Payment gateway client for deposit creation

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::PaymentsConfig,
    error::{AppError, AppResult},
};

/// The scheduling core only asks the gateway for a deposit reference and
/// reacts to webhook callbacks; the payment protocol itself lives on the
/// gateway side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_deposit(&self, amount: Decimal, reference: Uuid) -> AppResult<String>;
}

pub struct HttpPaymentGateway {
    client: reqwest::Client,
    config: PaymentsConfig,
}

impl HttpPaymentGateway {
    pub fn new(config: PaymentsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Serialize)]
struct CreateDepositRequest {
    amount: Decimal,
    reference: Uuid,
}

#[derive(Deserialize)]
struct CreateDepositResponse {
    payment_ref: String,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_deposit(&self, amount: Decimal, reference: Uuid) -> AppResult<String> {
        let Some(base_url) = &self.config.base_url else {
            // No gateway configured (dev): deposits settle only through
            // the webhook endpoint
            let payment_ref = format!("local-{}", reference);
            tracing::warn!(payment_ref = %payment_ref, "payment gateway not configured, issuing local reference");
            return Ok(payment_ref);
        };

        let mut request = self
            .client
            .post(format!("{}/deposits", base_url))
            .json(&CreateDepositRequest { amount, reference });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Payment(format!("deposit creation failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(AppError::Payment(format!(
                "gateway returned {}",
                response.status()
            )));
        }

        let body: CreateDepositResponse = response
            .json()
            .await
            .map_err(|e| AppError::Payment(format!("malformed gateway response: {}", e)))?;
        Ok(body.payment_ref)
    }
}

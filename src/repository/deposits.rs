//! Deposits repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{enums::DepositStatus, Deposit},
};

#[derive(Clone)]
pub struct DepositsRepository {
    pool: Pool<Postgres>,
}

impl DepositsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a pending deposit tied to a hold
    pub async fn create(
        &self,
        salon_id: Uuid,
        hold_id: Uuid,
        amount: Decimal,
        payment_ref: &str,
    ) -> AppResult<Deposit> {
        let row = sqlx::query_as::<_, Deposit>(
            r#"
            INSERT INTO deposits (id, salon_id, hold_id, amount, payment_ref, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(salon_id)
        .bind(hold_id)
        .bind(amount)
        .bind(payment_ref)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Deposit attached to a hold, if any
    pub async fn get_by_hold(&self, hold_id: Uuid) -> AppResult<Option<Deposit>> {
        let row = sqlx::query_as::<_, Deposit>("SELECT * FROM deposits WHERE hold_id = $1")
            .bind(hold_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Deposit by gateway reference
    pub async fn get_by_payment_ref(&self, payment_ref: &str) -> AppResult<Deposit> {
        sqlx::query_as::<_, Deposit>("SELECT * FROM deposits WHERE payment_ref = $1")
            .bind(payment_ref)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Deposit with reference {} not found", payment_ref))
            })
    }

    /// Conditional settle; returns None when the deposit is no longer in
    /// one of the expected states (callers re-read and decide)
    pub async fn settle(
        &self,
        payment_ref: &str,
        from: DepositStatus,
        to: DepositStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> AppResult<Option<Deposit>> {
        let row = sqlx::query_as::<_, Deposit>(
            r#"
            UPDATE deposits SET status = $3, paid_at = COALESCE($4, paid_at)
            WHERE payment_ref = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(payment_ref)
        .bind(from)
        .bind(to)
        .bind(paid_at)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

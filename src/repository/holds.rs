//! Holds repository: the serialized acquire/extend/release/consume path

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use super::overlap;
use crate::{
    error::{AppError, AppResult},
    models::{enums::HoldStatus, Hold},
};

/// Row data for a new hold, assembled by the service layer
pub struct NewHold {
    pub salon_id: Uuid,
    pub professional_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub client_fingerprint: String,
    pub client_id: Option<Uuid>,
    pub client_phone: Option<String>,
    pub service_id: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct HoldsRepository {
    pool: Pool<Postgres>,
}

impl HoldsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get hold by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Hold> {
        sqlx::query_as::<_, Hold>("SELECT * FROM holds WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hold {} not found", id)))
    }

    /// Acquire an exclusive claim on a slot. Serialized per (professional,
    /// date) by the agenda lock; exactly one of any set of contending
    /// callers gets the insert, the rest observe the conflict.
    pub async fn acquire(&self, hold: &NewHold, now: DateTime<Utc>) -> AppResult<Hold> {
        let mut tx = self.pool.begin().await?;

        overlap::lock_agenda(&mut *tx, hold.professional_id, hold.date).await?;
        overlap::expire_stale_holds(&mut *tx, hold.professional_id, hold.date, now).await?;

        let taken = overlap::slot_taken(
            &mut tx,
            hold.professional_id,
            hold.date,
            hold.start_time,
            hold.duration_minutes,
            now,
            None,
        )
        .await?;
        if taken {
            return Err(AppError::SlotConflict(format!(
                "Slot {} {} is no longer available",
                hold.date, hold.start_time
            )));
        }

        let created = sqlx::query_as::<_, Hold>(
            r#"
            INSERT INTO holds (
                id, salon_id, professional_id, date, start_time, duration_minutes,
                client_fingerprint, client_id, client_phone, service_id, status, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'active', $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(hold.salon_id)
        .bind(hold.professional_id)
        .bind(hold.date)
        .bind(hold.start_time)
        .bind(hold.duration_minutes)
        .bind(&hold.client_fingerprint)
        .bind(hold.client_id)
        .bind(&hold.client_phone)
        .bind(hold.service_id)
        .bind(hold.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Push the expiry of a still-live hold further out. A hold that has
    /// already expired, been consumed or been released cannot be revived.
    pub async fn extend(
        &self,
        id: Uuid,
        additional_seconds: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Hold> {
        sqlx::query_as::<_, Hold>(
            r#"
            UPDATE holds
            SET expires_at = expires_at + make_interval(secs => $2::double precision)
            WHERE id = $1 AND status = 'active' AND expires_at > $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(additional_seconds as f64)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Hold {} not found or no longer active", id)))
    }

    /// Client-initiated release; idempotent for anything but a consumed
    /// hold, which indicates a retry after a successful booking.
    pub async fn release(&self, id: Uuid) -> AppResult<Hold> {
        let hold = self.get(id).await?;
        match hold.status {
            HoldStatus::Consumed => Err(AppError::HoldAlreadyConsumed(format!(
                "Hold {} was already converted into an appointment",
                id
            ))),
            HoldStatus::Released | HoldStatus::Expired => Ok(hold),
            HoldStatus::Active => {
                let released = sqlx::query_as::<_, Hold>(
                    "UPDATE holds SET status = 'released' WHERE id = $1 AND status = 'active' RETURNING *",
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
                match released {
                    Some(h) => Ok(h),
                    // Lost a race with consume/sweep between read and update
                    None => {
                        let current = self.get(id).await?;
                        if current.status == HoldStatus::Consumed {
                            Err(AppError::HoldAlreadyConsumed(format!(
                                "Hold {} was already converted into an appointment",
                                id
                            )))
                        } else {
                            Ok(current)
                        }
                    }
                }
            }
        }
    }

    /// Consume a hold inside the caller's transaction (the same one that
    /// inserts the appointment). Never a silent success on a second call.
    pub(crate) async fn consume(
        conn: &mut PgConnection,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Hold> {
        let hold = sqlx::query_as::<_, Hold>("SELECT * FROM holds WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hold {} not found", id)))?;

        match hold.status {
            HoldStatus::Consumed => Err(AppError::HoldAlreadyConsumed(format!(
                "Hold {} was already converted into an appointment",
                id
            ))),
            HoldStatus::Released => Err(AppError::HoldExpired(format!(
                "Hold {} was released; acquire a new one",
                id
            ))),
            HoldStatus::Expired => Err(AppError::HoldExpired(format!(
                "Hold {} expired; acquire a new one",
                id
            ))),
            HoldStatus::Active if hold.is_expired_at(now) => {
                sqlx::query("UPDATE holds SET status = 'expired' WHERE id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                Err(AppError::HoldExpired(format!(
                    "Hold {} expired; acquire a new one",
                    id
                )))
            }
            HoldStatus::Active => {
                let consumed = sqlx::query_as::<_, Hold>(
                    "UPDATE holds SET status = 'consumed' WHERE id = $1 RETURNING *",
                )
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;
                Ok(consumed)
            }
        }
    }

    /// Transition every overrun active hold to expired, and expire the
    /// pending deposits that were waiting on them. Storage hygiene only;
    /// acquire and availability never depend on it having run.
    pub async fn expire_sweep(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let expired: Vec<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE holds SET status = 'expired'
            WHERE status = 'active' AND expires_at <= $1
            RETURNING id
            "#,
        )
        .bind(now)
        .fetch_all(&mut *tx)
        .await?;

        if !expired.is_empty() {
            sqlx::query(
                "UPDATE deposits SET status = 'expired' WHERE hold_id = ANY($1) AND status = 'pending'",
            )
            .bind(&expired)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(expired.len() as u64)
    }

    /// Live holds occupying a professional's day, expiry checked against
    /// `now` rather than the sweep.
    pub async fn live_for_date(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Hold>> {
        let rows = sqlx::query_as::<_, Hold>(
            r#"
            SELECT * FROM holds
            WHERE professional_id = $1 AND date = $2
              AND status = 'active' AND expires_at > $3
            ORDER BY start_time
            "#,
        )
        .bind(professional_id)
        .bind(date)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

//! Appointments repository: guarded inserts and status transitions

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

use super::{holds::HoldsRepository, overlap};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{AppointmentStatus, CreatedVia},
        Appointment, Hold,
    },
};

/// Row data for a new appointment, assembled by the service layer
pub struct NewAppointmentRow {
    pub salon_id: Uuid,
    pub professional_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    pub created_via: CreatedVia,
    pub reschedule_of: Option<Uuid>,
    pub confirmation_code: String,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: Pool<Postgres>,
}

impl AppointmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get appointment by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    /// List appointments for a salon, optionally narrowed to one
    /// professional and/or one day
    pub async fn list(
        &self,
        salon_id: Uuid,
        professional_id: Option<Uuid>,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE salon_id = $1
              AND ($2::uuid IS NULL OR professional_id = $2)
              AND ($3::date IS NULL OR date = $3)
            ORDER BY date, start_time
            "#,
        )
        .bind(salon_id)
        .bind(professional_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Appointments still occupying a professional's day
    pub async fn active_for_date(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE professional_id = $1 AND date = $2
              AND status NOT IN ('cancelled', 'no_show')
            ORDER BY start_time
            "#,
        )
        .bind(professional_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Direct insert (staff path). Runs the same agenda lock and overlap
    /// predicate as hold acquisition, in the same transaction as the
    /// insert, so the staff path cannot double-book either.
    pub async fn insert_guarded(
        &self,
        row: &NewAppointmentRow,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await?;

        overlap::lock_agenda(&mut *tx, row.professional_id, row.date).await?;
        overlap::expire_stale_holds(&mut *tx, row.professional_id, row.date, now).await?;

        let taken = overlap::slot_taken(
            &mut tx,
            row.professional_id,
            row.date,
            row.start_time,
            row.duration_minutes,
            now,
            None,
        )
        .await?;
        if taken {
            return Err(AppError::SlotConflict(format!(
                "Slot {} {} is no longer available",
                row.date, row.start_time
            )));
        }

        let created = Self::insert(&mut *tx, row).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Consume a hold and create its appointment in one transaction.
    /// Returns the consumed hold alongside the new appointment.
    pub async fn insert_from_hold(
        &self,
        hold_id: Uuid,
        client_id_override: Option<Uuid>,
        notes: Option<String>,
        confirmation_code: String,
        now: DateTime<Utc>,
    ) -> AppResult<(Appointment, Hold)> {
        // Plain read first to learn which agenda to lock
        let preview = sqlx::query_as::<_, Hold>("SELECT * FROM holds WHERE id = $1")
            .bind(hold_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Hold {} not found", hold_id)))?;

        let mut tx = self.pool.begin().await?;
        overlap::lock_agenda(&mut *tx, preview.professional_id, preview.date).await?;

        let hold = HoldsRepository::consume(&mut *tx, hold_id, now).await?;

        let client_id = client_id_override.or(hold.client_id).ok_or_else(|| {
            AppError::Validation("A client_id is required to confirm this hold".to_string())
        })?;
        let service_id = hold.service_id.ok_or_else(|| {
            AppError::Validation("Hold carries no service; acquire a new one".to_string())
        })?;

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

        let row = NewAppointmentRow {
            salon_id: hold.salon_id,
            professional_id: hold.professional_id,
            client_id,
            service_id,
            date: hold.date,
            start_time: hold.start_time,
            duration_minutes: hold.duration_minutes,
            created_via: CreatedVia::Online,
            reschedule_of: None,
            confirmation_code,
            notes,
        };
        let created = Self::insert(&mut *tx, &row).await?;

        sqlx::query(
            "UPDATE deposits SET appointment_id = $2 WHERE hold_id = $1",
        )
        .bind(hold.id)
        .bind(created.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((created, hold))
    }

    async fn insert(conn: &mut PgConnection, row: &NewAppointmentRow) -> AppResult<Appointment> {
        let created = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                id, salon_id, professional_id, client_id, service_id, date, start_time,
                duration_minutes, status, created_via, reschedule_of, confirmation_code, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'scheduled', $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(row.salon_id)
        .bind(row.professional_id)
        .bind(row.client_id)
        .bind(row.service_id)
        .bind(row.date)
        .bind(row.start_time)
        .bind(row.duration_minutes)
        .bind(row.created_via)
        .bind(row.reschedule_of)
        .bind(&row.confirmation_code)
        .bind(&row.notes)
        .fetch_one(conn)
        .await?;
        Ok(created)
    }

    /// Conditional status transition; zero rows means the guard failed,
    /// and a re-read tells NotFound apart from InvalidTransition.
    pub async fn transition(
        &self,
        id: Uuid,
        allowed: &[AppointmentStatus],
        to: AppointmentStatus,
    ) -> AppResult<Appointment> {
        let updated = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments SET status = $2, updated_at = now()
            WHERE id = $1 AND status = ANY($3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(to)
        .bind(allowed.to_vec())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(appointment) => Ok(appointment),
            None => {
                let current = self.get(id).await?;
                Err(AppError::InvalidTransition(format!(
                    "Appointment {} cannot move from {} to {}",
                    id, current.status, to
                )))
            }
        }
    }

    /// Cancel with reason and actor, guarded like any other transition
    pub async fn cancel(
        &self,
        id: Uuid,
        allowed: &[AppointmentStatus],
        reason: Option<String>,
        actor: Option<String>,
    ) -> AppResult<Appointment> {
        let updated = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = 'cancelled', cancel_reason = $2, cancelled_by = $3, updated_at = now()
            WHERE id = $1 AND status = ANY($4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&reason)
        .bind(&actor)
        .bind(allowed.to_vec())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(appointment) => Ok(appointment),
            None => {
                let current = self.get(id).await?;
                Err(AppError::InvalidTransition(format!(
                    "Appointment {} cannot be cancelled from {}",
                    id, current.status
                )))
            }
        }
    }

    /// Cancel + recreate, atomically. The original keeps its interval and
    /// history; the replacement passes the same overlap check as a fresh
    /// booking and references the original through reschedule_of.
    pub async fn reschedule(
        &self,
        id: Uuid,
        new_professional_id: Uuid,
        new_date: NaiveDate,
        new_start_time: NaiveTime,
        confirmation_code: String,
        actor: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<(Appointment, Appointment)> {
        let mut tx = self.pool.begin().await?;

        let original =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;

        if !matches!(
            original.status,
            AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
        ) {
            return Err(AppError::InvalidTransition(format!(
                "Appointment {} cannot be rescheduled from {}",
                id, original.status
            )));
        }

        overlap::lock_agenda(&mut *tx, new_professional_id, new_date).await?;
        overlap::expire_stale_holds(&mut *tx, new_professional_id, new_date, now).await?;

        let cancelled = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = 'cancelled', cancel_reason = 'rescheduled', cancelled_by = $2,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&actor)
        .fetch_one(&mut *tx)
        .await?;

        let taken = overlap::slot_taken(
            &mut tx,
            new_professional_id,
            new_date,
            new_start_time,
            original.duration_minutes,
            now,
            None,
        )
        .await?;
        if taken {
            return Err(AppError::SlotConflict(format!(
                "Slot {} {} is no longer available",
                new_date, new_start_time
            )));
        }

        let row = NewAppointmentRow {
            salon_id: original.salon_id,
            professional_id: new_professional_id,
            client_id: original.client_id,
            service_id: original.service_id,
            date: new_date,
            start_time: new_start_time,
            duration_minutes: original.duration_minutes,
            created_via: original.created_via,
            reschedule_of: Some(original.id),
            confirmation_code,
            notes: original.notes.clone(),
        };
        let replacement = Self::insert(&mut *tx, &row).await?;

        tx.commit().await?;
        Ok((cancelled, replacement))
    }
}

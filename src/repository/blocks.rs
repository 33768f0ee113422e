//! Professional-block repository (time off, absences)

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{enums::ApprovalStatus, Appointment, ProfessionalBlock},
};

/// Row data for a new block
pub struct NewBlock {
    pub salon_id: Uuid,
    pub professional_id: Uuid,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub reason: Option<String>,
    pub requires_approval: bool,
    pub approval_status: ApprovalStatus,
    pub created_by: Option<Uuid>,
}

#[derive(Clone)]
pub struct BlocksRepository {
    pool: Pool<Postgres>,
}

impl BlocksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get block by ID
    pub async fn get(&self, id: Uuid) -> AppResult<ProfessionalBlock> {
        sqlx::query_as::<_, ProfessionalBlock>("SELECT * FROM professional_blocks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Block {} not found", id)))
    }

    /// List blocks for a salon, optionally filtered by professional and
    /// date window
    pub async fn list(
        &self,
        salon_id: Uuid,
        professional_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<ProfessionalBlock>> {
        let rows = sqlx::query_as::<_, ProfessionalBlock>(
            r#"
            SELECT * FROM professional_blocks
            WHERE salon_id = $1
              AND ($2::uuid IS NULL OR professional_id = $2)
              AND ($3::date IS NULL OR ends_at >= $3::date)
              AND ($4::date IS NULL OR starts_at < ($4::date + 1))
            ORDER BY starts_at
            "#,
        )
        .bind(salon_id)
        .bind(professional_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a block
    pub async fn create(&self, block: &NewBlock) -> AppResult<ProfessionalBlock> {
        if block.starts_at >= block.ends_at {
            return Err(AppError::Validation(
                "starts_at must be before ends_at".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, ProfessionalBlock>(
            r#"
            INSERT INTO professional_blocks (
                id, salon_id, professional_id, starts_at, ends_at, reason,
                requires_approval, approval_status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(block.salon_id)
        .bind(block.professional_id)
        .bind(block.starts_at)
        .bind(block.ends_at)
        .bind(&block.reason)
        .bind(block.requires_approval)
        .bind(block.approval_status)
        .bind(block.created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Resolve a pending block; only pending blocks can be decided
    pub async fn decide(
        &self,
        id: Uuid,
        decision: ApprovalStatus,
    ) -> AppResult<ProfessionalBlock> {
        let updated = sqlx::query_as::<_, ProfessionalBlock>(
            r#"
            UPDATE professional_blocks SET approval_status = $2
            WHERE id = $1 AND approval_status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(decision)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(block) => Ok(block),
            None => {
                let current = self.get(id).await?;
                Err(AppError::InvalidTransition(format!(
                    "Block {} was already {:?}",
                    id, current.approval_status
                )))
            }
        }
    }

    /// Delete a block
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM professional_blocks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Block {} not found", id)));
        }
        Ok(())
    }

    /// Approved blocks touching one professional's day
    pub async fn approved_for_date(
        &self,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Vec<ProfessionalBlock>> {
        let rows = sqlx::query_as::<_, ProfessionalBlock>(
            r#"
            SELECT * FROM professional_blocks
            WHERE professional_id = $1
              AND approval_status = 'approved'
              AND starts_at < ($2::date + 1)
              AND ends_at > $2::date
            ORDER BY starts_at
            "#,
        )
        .bind(professional_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active appointments colliding with a block window, reported to the
    /// manager on approval
    pub async fn conflicting_appointments(
        &self,
        block: &ProfessionalBlock,
    ) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE professional_id = $1
              AND status NOT IN ('cancelled', 'no_show')
              AND (date + start_time) < $3
              AND (date + start_time + make_interval(mins => duration_minutes)) > $2
            ORDER BY date, start_time
            "#,
        )
        .bind(block.professional_id)
        .bind(block.starts_at)
        .bind(block.ends_at)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

//! Working-hours repository

use chrono::NaiveTime;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::WorkingHour,
};

#[derive(Clone)]
pub struct WorkingHoursRepository {
    pool: Pool<Postgres>,
}

impl WorkingHoursRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All rows for a professional, ordered by day then start
    pub async fn list(&self, professional_id: Uuid) -> AppResult<Vec<WorkingHour>> {
        let rows = sqlx::query_as::<_, WorkingHour>(
            "SELECT * FROM working_hours WHERE professional_id = $1 ORDER BY day_of_week, start_time",
        )
        .bind(professional_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Open intervals for one weekday, ordered by start
    pub async fn for_day(
        &self,
        professional_id: Uuid,
        day_of_week: i16,
    ) -> AppResult<Vec<WorkingHour>> {
        let rows = sqlx::query_as::<_, WorkingHour>(
            r#"
            SELECT * FROM working_hours
            WHERE professional_id = $1 AND day_of_week = $2
            ORDER BY start_time
            "#,
        )
        .bind(professional_id)
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert one open interval. Split shifts are separate rows; rows for
    /// one (professional, weekday) must not overlap, checked here and
    /// backstopped by the exclusion constraint.
    pub async fn create(
        &self,
        salon_id: Uuid,
        professional_id: Uuid,
        day_of_week: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> AppResult<WorkingHour> {
        if start_time >= end_time {
            return Err(AppError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        let overlaps: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM working_hours
                WHERE professional_id = $1 AND day_of_week = $2
                  AND start_time < $4 AND $3 < end_time
            )
            "#,
        )
        .bind(professional_id)
        .bind(day_of_week)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await?;
        if overlaps {
            return Err(AppError::Validation(format!(
                "Interval overlaps an existing shift on weekday {}",
                day_of_week
            )));
        }

        let row = sqlx::query_as::<_, WorkingHour>(
            r#"
            INSERT INTO working_hours (id, salon_id, professional_id, day_of_week, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(salon_id)
        .bind(professional_id)
        .bind(day_of_week)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete one interval
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM working_hours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Working hour {} not found", id)));
        }
        Ok(())
    }
}

//! Booking-rule repository (read-only input to the deposit gate)

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::BookingRule};

#[derive(Clone)]
pub struct BookingRulesRepository {
    pool: Pool<Postgres>,
}

impl BookingRulesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Active rules matching a client by id or by normalized phone.
    /// `phone_digits` must already be stripped to digits; the stored
    /// phone is normalized on the database side the same way.
    pub async fn active_for_client(
        &self,
        salon_id: Uuid,
        client_id: Option<Uuid>,
        phone_digits: Option<&str>,
    ) -> AppResult<Vec<BookingRule>> {
        let rows = sqlx::query_as::<_, BookingRule>(
            r#"
            SELECT * FROM booking_rules
            WHERE salon_id = $1
              AND is_active
              AND (
                  ($2::uuid IS NOT NULL AND client_id = $2)
                  OR (
                      $3::text IS NOT NULL AND client_phone IS NOT NULL
                      AND regexp_replace(client_phone, '\D', '', 'g') = $3
                  )
              )
            ORDER BY created_at
            "#,
        )
        .bind(salon_id)
        .bind(client_id)
        .bind(phone_digits)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

//! Shared agenda primitives: the advisory lock that serializes each
//! (professional, date) agenda, and the single overlap predicate both
//! booking paths (hold acquire and direct appointment insert) must use.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::AppResult;

/// Take the transaction-scoped advisory lock for one professional's day.
/// Every writer of that agenda goes through here before checking or
/// inserting, which totally orders contending bookings; the lock is
/// released on commit/rollback.
pub(crate) async fn lock_agenda(
    conn: &mut PgConnection,
    professional_id: Uuid,
    date: NaiveDate,
) -> AppResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text || '@' || $2::text, 0))")
        .bind(professional_id)
        .bind(date)
        .execute(conn)
        .await?;
    Ok(())
}

/// The one definition of "occupied": an appointment still occupying its
/// slot, or an active hold that has not passed its expiry. Expiry is
/// checked live against `now` so a hold never blocks a slot past its TTL,
/// swept or not.
pub(crate) async fn slot_taken(
    conn: &mut PgConnection,
    professional_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
    duration_minutes: i32,
    now: DateTime<Utc>,
    exclude_hold: Option<Uuid>,
) -> AppResult<bool> {
    let taken: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM appointments
            WHERE professional_id = $1
              AND date = $2
              AND status NOT IN ('cancelled', 'no_show')
              AND start_time < $3 + make_interval(mins => $4)
              AND $3 < start_time + make_interval(mins => duration_minutes)
        )
        OR EXISTS(
            SELECT 1 FROM holds
            WHERE professional_id = $1
              AND date = $2
              AND status = 'active'
              AND expires_at > $5
              AND ($6::uuid IS NULL OR id <> $6)
              AND start_time < $3 + make_interval(mins => $4)
              AND $3 < start_time + make_interval(mins => duration_minutes)
        )
        "#,
    )
    .bind(professional_id)
    .bind(date)
    .bind(start_time)
    .bind(duration_minutes)
    .bind(now)
    .bind(exclude_hold)
    .fetch_one(conn)
    .await?;
    Ok(taken)
}

/// Expire stale active holds on this agenda in-line, so correctness never
/// waits on the background sweep. Runs under the agenda lock.
pub(crate) async fn expire_stale_holds(
    conn: &mut PgConnection,
    professional_id: Uuid,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> AppResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE holds SET status = 'expired'
        WHERE professional_id = $1
          AND date = $2
          AND status = 'active'
          AND expires_at <= $3
        "#,
    )
    .bind(professional_id)
    .bind(date)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

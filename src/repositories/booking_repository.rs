//! PostgreSQL booking store
//!
//! Admission runs inside one transaction holding transaction-scoped advisory
//! locks: one per student request token (when present) and one per `(route, time)`
//! slot. Concurrent admissions for the same slot queue on the lock, so the
//! count they read always includes every booking committed before them.
//! Different slots hash to different locks and proceed in parallel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::{BookingStore, Cancellation, InsertOutcome, StoreError};
use crate::models::{Booking, BookingStatus, SlotKey};

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Block until this transaction holds the advisory lock for `key`
async fn advisory_lock(conn: &mut PgConnection, key: &str) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key)
        .execute(conn)
        .await?;
    Ok(())
}

async fn count_confirmed_in(
    conn: &mut PgConnection,
    route_id: &str,
    time: &str,
) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM bookings WHERE route_id = $1 AND time_slot = $2 AND status = $3",
    )
    .bind(route_id)
    .bind(time)
    .bind(BookingStatus::Confirmed)
    .fetch_one(conn)
    .await?;

    Ok(count)
}

#[async_trait]
impl BookingStore for PgBookingRepository {
    async fn count_confirmed(&self, route_id: &str, time: &str) -> Result<i64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(count_confirmed_in(&mut conn, route_id, time).await?)
    }

    async fn insert_within_capacity(
        &self,
        booking: Booking,
        capacity: i64,
        replay_since: DateTime<Utc>,
    ) -> Result<InsertOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        // token lock first, slot lock second; never the other way round
        if let Some(token) = booking.request_token.as_deref() {
            let token_key = format!("booking-token:{}:{}", booking.student_id, token);
            advisory_lock(&mut tx, &token_key).await?;

            let existing = sqlx::query_as::<_, Booking>(
                r#"
                SELECT * FROM bookings
                WHERE request_token = $1 AND student_id = $2 AND created_at >= $3
                ORDER BY created_at DESC
                LIMIT 1
                "#,
            )
            .bind(token)
            .bind(&booking.student_id)
            .bind(replay_since)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(existing) = existing {
                tx.commit().await?;
                if existing.slot() == booking.slot() {
                    log::info!("🔁 Replaying booking {} for token {}", existing.id, token);
                    return Ok(InsertOutcome::Replayed(existing));
                }
                log::warn!(
                    "⚠️ Token {} already used by booking {} for another slot",
                    token,
                    existing.id
                );
                return Ok(InsertOutcome::KeyReused(existing));
            }
        }

        let slot = SlotKey::new(booking.route_id.as_str(), booking.time.as_str());
        advisory_lock(&mut tx, &format!("booking-slot:{}", slot)).await?;

        let confirmed = count_confirmed_in(&mut tx, &booking.route_id, &booking.time).await?;
        if confirmed >= capacity {
            tx.rollback().await?;
            return Ok(InsertOutcome::Full { confirmed });
        }

        let inserted = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, student_id, route_id, time_slot, status, user_id, request_token, created_at, cancelled_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(booking.student_id)
        .bind(booking.route_id)
        .bind(booking.time)
        .bind(booking.status)
        .bind(booking.user_id)
        .bind(booking.request_token)
        .bind(booking.created_at)
        .bind(booking.cancelled_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(InsertOutcome::Inserted(inserted))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn list_by_student(&self, student_id: &str) -> Result<Vec<Booking>, StoreError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE student_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn cancel(&self, id: Uuid) -> Result<Option<Cancellation>, StoreError> {
        let updated = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2, cancelled_at = NOW()
            WHERE id = $1 AND status = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(BookingStatus::Cancelled)
        .bind(BookingStatus::Confirmed)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(booking) = updated {
            return Ok(Some(Cancellation {
                booking,
                already_cancelled: false,
            }));
        }

        // nothing updated: either unknown or cancelled before
        Ok(self.find_by_id(id).await?.map(|booking| Cancellation {
            booking,
            already_cancelled: true,
        }))
    }
}

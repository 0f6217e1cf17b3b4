use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use wrenchtime_core::errors::BookingResult;
use wrenchtime_core::models::{Booking, NewBooking, ReminderKind};
use wrenchtime_core::stores::BookingStore;

use crate::models::DbBooking;
use crate::repositories::db_err;

const BOOKING_COLUMNS: &str = "id, creator_id, mechanic_id, service_id, start_time, \
     duration_minutes, status, proposed_start_time, car_brand, car_model, car_plate, \
     client_name, client_phone, sent_3h, sent_1h, sent_30m, created_at";

#[derive(Clone)]
pub struct PgBookingStore {
    pool: Pool<Postgres>,
}

impl PgBookingStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PgBookingStore { pool }
    }
}

fn into_booking(row: DbBooking) -> BookingResult<Booking> {
    Ok(Booking::try_from(row)?)
}

fn into_bookings(rows: Vec<DbBooking>) -> BookingResult<Vec<Booking>> {
    rows.into_iter().map(into_booking).collect()
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn get(&self, id: i64) -> BookingResult<Option<Booking>> {
        let row = sqlx::query_as::<_, DbBooking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(into_booking).transpose()
    }

    async fn insert(&self, new: NewBooking) -> BookingResult<Booking> {
        let row = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            INSERT INTO bookings (
                creator_id, service_id, start_time, duration_minutes, status,
                car_brand, car_model, car_plate, client_name, client_phone
            )
            VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $8, $9)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(new.creator_id)
        .bind(new.service_id)
        .bind(new.start_time)
        .bind(new.duration_minutes)
        .bind(&new.details.car_brand)
        .bind(&new.details.car_model)
        .bind(&new.details.car_plate)
        .bind(&new.details.client_name)
        .bind(&new.details.client_phone)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        into_booking(row)
    }

    async fn blocking_in_range(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE start_time >= $1 AND start_time < $2
              AND status IN ('pending', 'negotiating', 'accepted')
            ORDER BY start_time ASC
            "#
        ))
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        into_bookings(rows)
    }

    async fn accept(&self, id: i64, mechanic_id: i64) -> BookingResult<Option<Booking>> {
        let row = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'accepted', mechanic_id = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(mechanic_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(into_booking).transpose()
    }

    async fn reject(&self, id: i64) -> BookingResult<Option<Booking>> {
        let row = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'rejected'
            WHERE id = $1 AND status = 'pending'
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(into_booking).transpose()
    }

    async fn propose_time(
        &self,
        id: i64,
        proposed: DateTime<Utc>,
    ) -> BookingResult<Option<Booking>> {
        let row = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'negotiating', proposed_start_time = $2
            WHERE id = $1 AND status IN ('accepted', 'negotiating')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(proposed)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(into_booking).transpose()
    }

    async fn confirm_proposed(&self, id: i64) -> BookingResult<Option<Booking>> {
        let row = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'accepted',
                start_time = proposed_start_time,
                proposed_start_time = NULL
            WHERE id = $1 AND status = 'negotiating' AND proposed_start_time IS NOT NULL
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(into_booking).transpose()
    }

    async fn cancel(&self, id: i64) -> BookingResult<Option<Booking>> {
        let row = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled'
            WHERE id = $1 AND status IN ('pending', 'negotiating', 'accepted')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(into_booking).transpose()
    }

    async fn accepted_starting_after(&self, now: DateTime<Utc>) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE status = 'accepted' AND start_time > $1
            ORDER BY start_time ASC
            "#
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        into_bookings(rows)
    }

    async fn mark_reminders_sent(&self, sent: &[(i64, ReminderKind)]) -> BookingResult<()> {
        if sent.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(db_err)?;
        for (id, kind) in sent {
            let column = match kind {
                ReminderKind::ThreeHours => "sent_3h",
                ReminderKind::OneHour => "sent_1h",
                ReminderKind::ThirtyMinutes => "sent_30m",
            };
            sqlx::query(&format!(
                "UPDATE bookings SET {column} = TRUE WHERE id = $1"
            ))
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)?;

        Ok(())
    }

    async fn pending(&self) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE status = 'pending'
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        into_bookings(rows)
    }

    async fn by_creator(&self, creator_id: i64, limit: i64) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE creator_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(creator_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        into_bookings(rows)
    }

    async fn by_mechanic(&self, mechanic_id: i64, limit: i64) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, DbBooking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE mechanic_id = $1
            ORDER BY start_time ASC
            LIMIT $2
            "#
        ))
        .bind(mechanic_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        into_bookings(rows)
    }
}

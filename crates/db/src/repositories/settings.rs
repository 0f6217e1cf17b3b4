use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use wrenchtime_core::errors::BookingResult;
use wrenchtime_core::models::WorkingHours;
use wrenchtime_core::stores::SettingsStore;

use crate::models::DbSettings;
use crate::repositories::db_err;

const SETTINGS_COLUMNS: &str =
    "start_time, end_time, slot_step_minutes, buffer_minutes, days_ahead, timezone, updated_at";

#[derive(Clone)]
pub struct PgSettingsStore {
    pool: Pool<Postgres>,
}

impl PgSettingsStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PgSettingsStore { pool }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get(&self) -> BookingResult<WorkingHours> {
        // Insert the default row on first read; later reads hit the
        // existing singleton.
        let row = sqlx::query_as::<_, DbSettings>(&format!(
            r#"
            INSERT INTO settings (id) VALUES (1)
            ON CONFLICT (id) DO UPDATE SET id = settings.id
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(WorkingHours::from(row))
    }

    async fn update(&self, hours: WorkingHours) -> BookingResult<WorkingHours> {
        hours.validate()?;

        let row = sqlx::query_as::<_, DbSettings>(&format!(
            r#"
            UPDATE settings
            SET start_time = $1,
                end_time = $2,
                slot_step_minutes = $3,
                buffer_minutes = $4,
                days_ahead = $5,
                timezone = $6,
                updated_at = NOW()
            WHERE id = 1
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(hours.start_time)
        .bind(hours.end_time)
        .bind(hours.slot_step_minutes)
        .bind(hours.buffer_minutes)
        .bind(hours.days_ahead)
        .bind(&hours.timezone)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(WorkingHours::from(row))
    }
}

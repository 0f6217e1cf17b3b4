use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use wrenchtime_core::errors::BookingResult;
use wrenchtime_core::models::Service;
use wrenchtime_core::stores::ServiceStore;

use crate::models::DbService;
use crate::repositories::db_err;

#[derive(Clone)]
pub struct PgServiceStore {
    pool: Pool<Postgres>,
}

impl PgServiceStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PgServiceStore { pool }
    }
}

#[async_trait]
impl ServiceStore for PgServiceStore {
    async fn get(&self, id: i64) -> BookingResult<Option<Service>> {
        let row = sqlx::query_as::<_, DbService>(
            "SELECT id, name, duration_minutes, price, is_active, created_at \
             FROM services WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Service::from))
    }

    async fn list_active(&self) -> BookingResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, DbService>(
            "SELECT id, name, duration_minutes, price, is_active, created_at \
             FROM services WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn create(
        &self,
        name: &str,
        duration_minutes: i64,
        price: Option<f64>,
    ) -> BookingResult<Service> {
        let row = sqlx::query_as::<_, DbService>(
            r#"
            INSERT INTO services (name, duration_minutes, price)
            VALUES ($1, $2, $3)
            RETURNING id, name, duration_minutes, price, is_active, created_at
            "#,
        )
        .bind(name)
        .bind(duration_minutes)
        .bind(price)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(Service::from(row))
    }

    async fn set_active(&self, id: i64, is_active: bool) -> BookingResult<Option<Service>> {
        let row = sqlx::query_as::<_, DbService>(
            r#"
            UPDATE services SET is_active = $2
            WHERE id = $1
            RETURNING id, name, duration_minutes, price, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(Service::from))
    }
}

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use wrenchtime_core::errors::BookingResult;
use wrenchtime_core::models::User;
use wrenchtime_core::stores::UserStore;

use crate::models::DbUser;
use crate::repositories::db_err;

const USER_COLUMNS: &str =
    "id, display_name, role, is_active, remind_3h, remind_1h, remind_30m, created_at";

#[derive(Clone)]
pub struct PgUserStore {
    pool: Pool<Postgres>,
}

impl PgUserStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PgUserStore { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get(&self, id: i64) -> BookingResult<Option<User>> {
        let row = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(|u| Ok(User::try_from(u)?)).transpose()
    }

    async fn active_mechanics(&self) -> BookingResult<Vec<User>> {
        let rows = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE role = 'mechanic' AND is_active = TRUE ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(|u| Ok(User::try_from(u)?)).collect()
    }
}

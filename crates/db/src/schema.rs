use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            display_name VARCHAR(255) NOT NULL,
            role VARCHAR(20) NOT NULL DEFAULT 'customer'
                CHECK (role IN ('admin', 'mechanic', 'customer')),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            remind_3h BOOLEAN NOT NULL DEFAULT TRUE,
            remind_1h BOOLEAN NOT NULL DEFAULT TRUE,
            remind_30m BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            duration_minutes BIGINT NOT NULL CHECK (duration_minutes > 0),
            price DOUBLE PRECISION NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id BIGSERIAL PRIMARY KEY,
            creator_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            mechanic_id BIGINT NULL REFERENCES users(id) ON DELETE SET NULL,
            service_id BIGINT NOT NULL REFERENCES services(id) ON DELETE RESTRICT,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            duration_minutes BIGINT NOT NULL CHECK (duration_minutes > 0),
            status VARCHAR(20) NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'negotiating', 'accepted',
                                  'rejected', 'completed', 'cancelled')),
            proposed_start_time TIMESTAMP WITH TIME ZONE NULL,
            car_brand VARCHAR(100) NOT NULL,
            car_model VARCHAR(100) NOT NULL,
            car_plate VARCHAR(20) NOT NULL,
            client_name VARCHAR(255) NOT NULL,
            client_phone VARCHAR(20) NOT NULL,
            sent_3h BOOLEAN NOT NULL DEFAULT FALSE,
            sent_1h BOOLEAN NOT NULL DEFAULT FALSE,
            sent_30m BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create settings singleton table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id SMALLINT PRIMARY KEY DEFAULT 1 CHECK (id = 1),
            start_time TIME NOT NULL DEFAULT '08:00',
            end_time TIME NOT NULL DEFAULT '16:00',
            slot_step_minutes BIGINT NOT NULL DEFAULT 10,
            buffer_minutes BIGINT NOT NULL DEFAULT 15,
            days_ahead BIGINT NOT NULL DEFAULT 14,
            timezone VARCHAR(50) NOT NULL DEFAULT 'Europe/Warsaw',
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_work_hours CHECK (start_time < end_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_bookings_start_time ON bookings(start_time);
        CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status);
        CREATE INDEX IF NOT EXISTS idx_bookings_creator_id ON bookings(creator_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_mechanic_id ON bookings(mechanic_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}

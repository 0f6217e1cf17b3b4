use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use tracing::info;
use wrenchtime_db::repositories::{PgBookingStore, PgUserStore};
use wrenchtime_db::schema::initialize_database;
use wrenchtime_engine::{AppConfig, ReminderScheduler, SystemClock, TracingNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // Create database connection pool
    let db_pool = wrenchtime_db::create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let bookings = Arc::new(PgBookingStore::new(db_pool.clone()));
    let users = Arc::new(PgUserStore::new(db_pool));

    // Start the reminder scheduler and run until interrupted
    let mut scheduler = ReminderScheduler::new(
        bookings,
        users,
        Arc::new(TracingNotifier),
        Arc::new(SystemClock),
    );
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    scheduler.stop().await;

    Ok(())
}

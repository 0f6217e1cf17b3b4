use color_eyre::eyre::Result;
use dotenv::dotenv;
use wrenchtime_db::schema::initialize_database;
use wrenchtime_engine::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = AppConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let db_pool = wrenchtime_db::create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    Ok(())
}

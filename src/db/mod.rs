use log::{info, warn};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;

/// Connects to Postgres, retrying while the database is still coming up.
pub async fn create_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let attempts = config.connect_attempts.max(1);
    let mut attempt = 1;

    loop {
        match PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                info!("Database is ready");
                return Ok(pool);
            }
            Err(err) if attempt < attempts => {
                warn!("Database not ready ({}), retrying ({}/{})", err, attempt, attempts);
                tokio::time::sleep(config.connect_retry_delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations applied successfully");
    Ok(())
}

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{config::DatabaseConfig, error::Result};

/// Connects to the database and runs migrations.
///
/// When the database cannot be reached the failure is logged and a lazily
/// connecting pool is returned instead, so the server still starts and
/// each request fails on its own.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let options = PgPoolOptions::new().max_connections(config.max_connections);

    match options.clone().connect(&config.url).await {
        Ok(pool) => {
            tracing::info!(
                "Database connection established with {} max connections",
                config.max_connections
            );

            if let Err(e) = sqlx::migrate!().run(&pool).await {
                tracing::error!("Failed to run migrations: {}", e);
            }

            Ok(pool)
        }
        Err(e) => {
            tracing::error!("Failed to connect to database: {}", e);

            let pool = options.connect_lazy(&config.url).map_err(|e| {
                crate::error::AppError::ConfigError(format!("Invalid DB_URL: {}", e))
            })?;

            Ok(pool)
        }
    }
}

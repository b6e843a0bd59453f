//! PostgreSQL connection
//!
//! Opens the pool and applies the schema migrations under `migrations/`.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;

/// Owned handle to the connection pool
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Connect and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("🗄️  Connecting to {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .context("failed to open the database pool")?;

        run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Apply pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to run database migrations")?;
    info!("✅ Database migrations applied");
    Ok(())
}

/// Hide credentials before a URL reaches the logs
fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}

//! Database configuration
//!
//! Pool sizing for the PostgreSQL connection pool. Sizes can be tuned with
//! `DB_MAX_CONNECTIONS`, `DB_MIN_CONNECTIONS` and `DB_ACQUIRE_TIMEOUT_SECS`.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request may wait for a pooled connection
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        }
    }

    /// Pool settings for `url`, with sizes overridden from the environment
    pub fn from_env(url: impl Into<String>) -> Result<Self> {
        let mut config = Self::new(url);

        if let Some(max) = read_u64("DB_MAX_CONNECTIONS")? {
            config.max_connections = max as u32;
        }
        if let Some(min) = read_u64("DB_MIN_CONNECTIONS")? {
            config.min_connections = min as u32;
        }
        if let Some(secs) = read_u64("DB_ACQUIRE_TIMEOUT_SECS")? {
            config.acquire_timeout = Duration::from_secs(secs);
        }

        // the pool refuses min > max
        config.min_connections = config.min_connections.min(config.max_connections);
        Ok(config)
    }

    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}

fn read_u64(name: &str) -> Result<Option<u64>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", name, raw)),
        Err(_) => Ok(None),
    }
}

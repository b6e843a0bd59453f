//! Environment configuration
//!
//! Reads the service configuration from environment variables (after
//! `.env` has been loaded by `dotenvy`).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEV_JWT_SECRET: &str = "development-only-shuttle-secret";

/// Upper bound for `JWT_EXPIRATION` and `IDEMPOTENCY_WINDOW_SECS` (30 days)
pub const MAX_DURATION_SECS: u64 = 30 * 24 * 60 * 60;

/// Service configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub idempotency_window_secs: u64,
    pub bcrypt_cost: u32,
    pub default_admin_id: String,
    pub default_admin_password: String,
    pub default_admin_name: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            database_url: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration: 3600,
            cors_origins: Vec::new(),
            request_timeout_secs: 30,
            idempotency_window_secs: 86_400,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            default_admin_id: "ADMIN01".to_string(),
            default_admin_password: "admin123".to_string(),
            default_admin_name: "Default Admin".to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Build the configuration from the process environment, falling back to
    /// the development defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);
        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .unwrap_or(defaults.jwt_secret);

        let config = Self {
            port: parse_var("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            jwt_secret,
            jwt_expiration: parse_var("JWT_EXPIRATION", defaults.jwt_expiration)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| split_origins(&origins))
                .unwrap_or_default(),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            idempotency_window_secs: parse_var(
                "IDEMPOTENCY_WINDOW_SECS",
                defaults.idempotency_window_secs,
            )?,
            bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost)?,
            default_admin_id: env::var("DEFAULT_ADMIN_ID").unwrap_or(defaults.default_admin_id),
            default_admin_password: env::var("DEFAULT_ADMIN_PASSWORD")
                .unwrap_or(defaults.default_admin_password),
            default_admin_name: env::var("DEFAULT_ADMIN_NAME")
                .unwrap_or(defaults.default_admin_name),
            environment,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.is_production() && self.jwt_secret == DEV_JWT_SECRET {
            bail!("JWT_SECRET must be set in production");
        }
        if self.jwt_expiration == 0 || self.jwt_expiration > MAX_DURATION_SECS {
            bail!(
                "JWT_EXPIRATION must be between 1 and {} seconds, got {}",
                MAX_DURATION_SECS,
                self.jwt_expiration
            );
        }
        if self.idempotency_window_secs > MAX_DURATION_SECS {
            bail!(
                "IDEMPOTENCY_WINDOW_SECS must be at most {} seconds, got {}",
                MAX_DURATION_SECS,
                self.idempotency_window_secs
            );
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Address the HTTP listener binds to
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn idempotency_window(&self) -> chrono::Duration {
        let secs = self.idempotency_window_secs.min(MAX_DURATION_SECS);
        chrono::Duration::seconds(secs as i64)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_deployment() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.jwt_expiration, 3600);
        assert_eq!(config.default_admin_id, "ADMIN01");
        assert!(config.database_url.is_none());
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_durations() {
        let window = EnvironmentConfig {
            idempotency_window_secs: u64::MAX,
            ..EnvironmentConfig::default()
        };
        assert!(window.validate().is_err());

        let expiration = EnvironmentConfig {
            jwt_expiration: u64::MAX,
            ..EnvironmentConfig::default()
        };
        assert!(expiration.validate().is_err());
    }

    #[test]
    fn test_validate_requires_secret_in_production() {
        let production = EnvironmentConfig {
            environment: "production".to_string(),
            ..EnvironmentConfig::default()
        };
        assert!(production.validate().is_err());

        let configured = EnvironmentConfig {
            jwt_secret: "a-real-secret".to_string(),
            ..production
        };
        assert!(configured.validate().is_ok());
    }

    #[test]
    fn test_idempotency_window_is_clamped() {
        let config = EnvironmentConfig {
            idempotency_window_secs: u64::MAX,
            ..EnvironmentConfig::default()
        };
        assert_eq!(config.idempotency_window(), chrono::Duration::days(30));
    }

    #[test]
    fn test_split_origins_skips_blanks() {
        let origins = split_origins("http://localhost:3000, ,https://shuttle.example.edu");
        assert_eq!(
            origins,
            vec!["http://localhost:3000", "https://shuttle.example.edu"]
        );
    }

    #[test]
    fn test_server_url() {
        let config = EnvironmentConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..EnvironmentConfig::default()
        };
        assert_eq!(config.server_url(), "127.0.0.1:8080");
    }
}

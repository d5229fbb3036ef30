//! Session configuration loaded from the environment

use anyhow::Result;

/// Deployment environment flag
///
/// Only the production/non-production distinction matters to this core: it
/// decides whether the session cookie carries the `Secure` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse an environment name; anything other than `production` is
    /// treated as development
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Symmetric secret used to sign session tokens (HS256)
    pub secret: String,
    /// Deployment environment, controls the cookie `Secure` attribute
    pub environment: Environment,
    /// Session lifetime in days (default: 7)
    pub session_ttl_days: i64,
}

impl SessionConfig {
    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_SECRET`: Symmetric signing secret (required)
    /// - `APP_ENV`: `production` enables the secure cookie attribute
    ///   (default: development)
    /// - `SESSION_TTL_DAYS`: Session lifetime in days (default: 7)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable not set"))?;

        let environment = std::env::var("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);

        let session_ttl_days = std::env::var("SESSION_TTL_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .unwrap_or(7);

        Ok(SessionConfig {
            secret,
            environment,
            session_ttl_days,
        })
    }

    /// Create a config with the default 7-day lifetime
    pub fn new(secret: impl Into<String>, environment: Environment) -> Self {
        SessionConfig {
            secret: secret.into(),
            environment,
            session_ttl_days: 7,
        }
    }
}

//! Session token issuance and cookie lifecycle
//!
//! This module builds the signed session credential (HS256 JWT) for an
//! authenticated user and writes it into the client cookie jar with the
//! attributes the rest of the application relies on. It also reads the
//! current session back out of the jar and tears it down on logout.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::AuthError;
use crate::stores::{Clock, CookieStore, SystemClock};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "auth-token";

/// Signed session claims
///
/// `expires_at` is the application-level expiry carried as an ISO-8601
/// timestamp; `exp` repeats it in seconds so the token library enforces
/// expiration on its own as well. The two are always derived from the same
/// instant and never drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
    pub iat: i64,
    pub exp: i64,
}

/// `SameSite` cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes the session cookie is written with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieAttributes {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub expires: DateTime<Utc>,
}

/// Session issuer
///
/// Owns the signing keys and the injected cookie jar. The clock is
/// injectable so expiry math is deterministic under test; production code
/// uses [`SystemClock`].
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    secure_cookies: bool,
    ttl_days: i64,
    cookies: Arc<dyn CookieStore>,
    clock: Arc<dyn Clock>,
}

impl SessionIssuer {
    /// Initialize a new session issuer with the system clock
    pub fn new(config: &SessionConfig, cookies: Arc<dyn CookieStore>) -> Self {
        Self::with_clock(config, cookies, Arc::new(SystemClock))
    }

    /// Initialize a new session issuer with an explicit clock
    pub fn with_clock(
        config: &SessionConfig,
        cookies: Arc<dyn CookieStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        SessionIssuer {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            secure_cookies: config.environment.is_production(),
            ttl_days: config.session_ttl_days,
            cookies,
            clock,
        }
    }

    /// Create a session for a user and write the session cookie
    ///
    /// The current time is sampled once; the claims' `expires_at` and the
    /// cookie's `expires` both come from that sample. If signing fails the
    /// cookie jar is never touched.
    pub async fn create_session(&self, user_id: &str, email: &str) -> Result<(), AuthError> {
        info!("Creating session for user: {}", user_id);

        let now = self.clock.now();
        let expires_at = now + Duration::days(self.ttl_days);

        let claims = SessionClaims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            expires_at,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)?;

        let attributes = CookieAttributes {
            http_only: true,
            secure: self.secure_cookies,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            expires: expires_at,
        };

        self.cookies
            .set(SESSION_COOKIE, &token, attributes)
            .await
            .map_err(AuthError::CookieStore)?;

        Ok(())
    }

    /// Read and validate the current session from the cookie jar
    ///
    /// A missing cookie, a token that fails signature or expiry checks, or
    /// a malformed payload all mean "not signed in" and return `None`; only
    /// a cookie jar failure is an error.
    pub async fn current_session(&self) -> Result<Option<SessionClaims>, AuthError> {
        let token = self
            .cookies
            .get(SESSION_COOKIE)
            .await
            .map_err(AuthError::CookieStore)?;

        let Some(token) = token else {
            return Ok(None);
        };

        match decode::<SessionClaims>(&token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(Some(data.claims)),
            Err(err) => {
                warn!("Rejecting session token: {}", err);
                Ok(None)
            }
        }
    }

    /// Delete the session cookie
    pub async fn destroy_session(&self) -> Result<(), AuthError> {
        info!("Destroying session");

        self.cookies
            .delete(SESSION_COOKIE)
            .await
            .map_err(AuthError::CookieStore)
    }
}

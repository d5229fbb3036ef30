//! Custom error types for the authentication core
//!
//! A rejected credential is not an error: verifiers report it as a normal
//! [`AuthResult::Failure`](crate::models::AuthResult) return value. The
//! variants here cover the unexpected failures that propagate to the caller.

use thiserror::Error;

/// Errors raised by session issuance and post-auth reconciliation
#[derive(Error, Debug)]
pub enum AuthError {
    /// The signing primitive could not produce a session token
    #[error("Token signing error: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The cookie store raised while reading or writing the session cookie
    #[error("Cookie store error: {0}")]
    CookieStore(#[source] anyhow::Error),

    /// A collaborator store (verifier transport, anon-work tracker,
    /// project store) raised
    #[error("Store error: {0}")]
    Store(#[source] anyhow::Error),
}

/// Type alias for Result with AuthError
pub type AuthCoreResult<T> = Result<T, AuthError>;

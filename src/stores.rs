//! Collaborator contracts consumed by the authentication core
//!
//! Credential verification, the anonymous-work tracker, project
//! persistence, the cookie jar, and navigation all live outside this crate.
//! They are injected at construction behind these traits so the session and
//! reconciliation logic stays pure and unit-testable against fakes.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{AnonWork, AuthResult, NewProject, Project};
use crate::session::CookieAttributes;

/// Verifies credentials against the user database
///
/// On success the implementation is also responsible for issuing the
/// session (the server-side sign-in action calls
/// [`SessionIssuer::create_session`](crate::session::SessionIssuer) before
/// returning). Only transport or store breakage is an `Err`; a rejected
/// credential is a normal [`AuthResult::Failure`].
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResult>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResult>;
}

/// Tracker holding at most one snapshot of pre-authentication work
#[async_trait]
pub trait AnonWorkStore: Send + Sync {
    /// The recorded snapshot, if any
    async fn get(&self) -> Result<Option<AnonWork>>;
    /// Drop the recorded snapshot
    async fn clear(&self) -> Result<()>;
}

/// Persistence for the authenticated user's projects
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// List the user's projects, most recently updated first
    ///
    /// Index 0 must be the most recent project; the orchestrator relies on
    /// this ordering instead of sorting on its own.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Create and persist a new project
    async fn create_project(&self, new_project: NewProject) -> Result<Project>;
}

/// The client cookie jar
#[async_trait]
pub trait CookieStore: Send + Sync {
    async fn set(&self, name: &str, value: &str, attributes: CookieAttributes) -> Result<()>;
    async fn get(&self, name: &str) -> Result<Option<String>>;
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Navigation sink the reconciliation outcome is emitted to
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

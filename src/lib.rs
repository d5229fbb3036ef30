//! Authentication core for the design studio application
//!
//! This crate provides the two pieces of the sign-in path that the UI and
//! server layers build on: issuing the signed session cookie, and the
//! orchestration that runs after a successful sign-in or sign-up to decide
//! which project the user lands on. Credential verification, project
//! persistence, the cookie jar, and navigation are all external
//! collaborators injected through the traits in [`stores`].

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod session;
pub mod stores;

pub use config::{Environment, SessionConfig};
pub use error::AuthError;
pub use models::{AnonWork, AuthResult, ChatMessage, NewProject, Project};
pub use orchestrator::AuthOrchestrator;
pub use session::{SessionClaims, SessionIssuer};

//! Authentication core models

pub mod auth;
pub mod project;
pub mod work;

// Re-export for convenience
pub use auth::AuthResult;
pub use project::{NewProject, Project};
pub use work::{AnonWork, ChatMessage, FileSystemSnapshot, MessageRole};

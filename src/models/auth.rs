//! Verification outcome

/// Terminal outcome of a credential verification attempt
///
/// A failure here is an expected, non-exceptional result (bad password,
/// taken email) and is returned by value, never raised. Transport or store
/// breakage surfaces as [`AuthError`](crate::error::AuthError) instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Success,
    Failure { error: String },
}

impl AuthResult {
    /// A failed verification with the given user-facing message
    pub fn failure(error: impl Into<String>) -> Self {
        AuthResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthResult::Success)
    }

    /// The failure message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            AuthResult::Success => None,
            AuthResult::Failure { error } => Some(error),
        }
    }
}

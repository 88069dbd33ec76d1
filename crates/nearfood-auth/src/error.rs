//! Authentication errors.

use nearfood_store::StoreError;
use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Bad email or password. Deliberately the same message for unknown
    /// email and wrong password, so callers cannot probe for accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Email already has an account.
    #[error("An account with this email already exists")]
    EmailInUse,

    /// Missing, malformed, or expired bearer token.
    #[error("Authentication required")]
    Unauthenticated,

    /// Password fails the sign-up policy.
    #[error("Password too weak: {0}")]
    WeakPassword(String),

    /// Email fails shape validation.
    #[error("Invalid email address")]
    InvalidEmail,

    /// Backend failure unrelated to the credentials themselves.
    #[error("auth backend error: {0}")]
    Store(StoreError),
}

impl AuthError {
    /// True for failures caused by what the caller sent, as opposed to
    /// backend trouble.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::Store(_))
    }
}

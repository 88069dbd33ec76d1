//! Auth API surface of the BaaS.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// The user attached to a verified session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
}

/// Result of a successful sign-up or sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: SessionUser,
}

/// Password auth as the hosted backend provides it. The storefront never
/// sees password hashes; it only exchanges credentials for tokens and
/// tokens for users.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Register a new account. Fails with [`StoreError::Conflict`] when the
    /// email is already taken.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, StoreError>;

    /// Exchange credentials for a session. Fails with
    /// [`StoreError::Unauthorized`] on bad credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError>;

    /// Resolve a bearer token to its user. Fails with
    /// [`StoreError::Unauthorized`] when the token is unknown or expired.
    async fn session_user(&self, token: &str) -> Result<SessionUser, StoreError>;
}

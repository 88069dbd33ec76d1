//! Auth client over the hosted backend's password auth.

use nearfood_store::{AuthSession, SessionUser, Store, StoreError};

use crate::policy::{validate_email, validate_new_password};
use crate::AuthError;

/// High-level auth operations, shared by the HTTP handlers.
#[derive(Clone)]
pub struct AuthClient {
    store: Store,
}

impl AuthClient {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create an account and return its first session.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        validate_email(email)?;
        validate_new_password(password)?;

        let email = email.trim().to_ascii_lowercase();
        match self.store.auth().sign_up(&email, password).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "account created");
                Ok(session)
            }
            Err(StoreError::Conflict(_)) => Err(AuthError::EmailInUse),
            Err(e) => Err(AuthError::Store(e)),
        }
    }

    /// Exchange credentials for a session token.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        // Sign-in only checks shape, never strength: the stored password
        // decides, and policy changes must not lock out old accounts.
        validate_email(email)?;
        if password.chars().count() < 6 {
            return Err(AuthError::InvalidCredentials);
        }

        let email = email.trim().to_ascii_lowercase();
        match self.store.auth().sign_in(&email, password).await {
            Ok(session) => Ok(session),
            Err(StoreError::Unauthorized) | Err(StoreError::NotFound) => {
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => Err(AuthError::Store(e)),
        }
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<SessionUser, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        match self.store.auth().session_user(token).await {
            Ok(user) => Ok(user),
            Err(StoreError::Unauthorized) | Err(StoreError::NotFound) => {
                Err(AuthError::Unauthenticated)
            }
            Err(e) => Err(AuthError::Store(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AuthClient {
        AuthClient::new(Store::in_memory())
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let client = client();
        let session = client.sign_up("ada@example.com", "Secure#Pass1").await.unwrap();
        assert_eq!(session.user.email, "ada@example.com");

        let again = client.sign_in("ada@example.com", "Secure#Pass1").await.unwrap();
        assert_eq!(again.user.id, session.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let client = client();
        client.sign_up("ada@example.com", "Secure#Pass1").await.unwrap();
        let err = client.sign_up("ada@example.com", "Other#Pass2").await.unwrap_err();
        assert!(matches!(err, AuthError::EmailInUse));
    }

    #[tokio::test]
    async fn email_is_normalized() {
        let client = client();
        client.sign_up("  Ada@Example.COM ", "Secure#Pass1").await.unwrap();
        assert!(client.sign_in("ada@example.com", "Secure#Pass1").await.is_ok());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let client = client();
        client.sign_up("ada@example.com", "Secure#Pass1").await.unwrap();

        let wrong_pw = client.sign_in("ada@example.com", "Bad#Pass99").await.unwrap_err();
        let no_user = client.sign_in("ghost@example.com", "Bad#Pass99").await.unwrap_err();
        assert_eq!(wrong_pw.to_string(), no_user.to_string());
    }

    #[tokio::test]
    async fn tokens_round_trip() {
        let client = client();
        let session = client.sign_up("ada@example.com", "Secure#Pass1").await.unwrap();

        let user = client.authenticate(&session.access_token).await.unwrap();
        assert_eq!(user.email, "ada@example.com");

        let err = client.authenticate("bogus-token").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn weak_sign_up_password_never_reaches_the_backend() {
        let client = client();
        let err = client.sign_up("ada@example.com", "weak").await.unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
        // The account was not created.
        let err = client.sign_in("ada@example.com", "weak").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}

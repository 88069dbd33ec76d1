//! Store error types.

use thiserror::Error;

/// Errors surfaced by the table and auth APIs.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Single-row fetch matched nothing.
    #[error("row not found")]
    NotFound,

    /// Credentials or session token rejected by the auth API.
    #[error("unauthorized")]
    Unauthorized,

    /// Write conflicts with existing data.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Backend returned a non-success HTTP status.
    #[error("backend returned status {status}")]
    Http { status: u16 },

    /// Request never reached the backend.
    #[error("connection error: {0}")]
    Connection(String),

    /// Row could not be decoded into the requested type.
    #[error("deserialization error: {0}")]
    Deserialize(String),

    /// Value passed as a row was not a JSON object.
    #[error("invalid row: {0}")]
    InvalidRow(String),
}

impl StoreError {
    /// The distinguishable "no rows" outcome callers treat as absence,
    /// not failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }

    /// Whether a retry of the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Connection(_) => true,
            StoreError::Http { status } => (500..600).contains(status),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Deserialize(e.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            StoreError::Http {
                status: status.as_u16(),
            }
        } else {
            StoreError::Connection(e.to_string())
        }
    }
}

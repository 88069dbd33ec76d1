//! HTTP error taxonomy and its status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nearfood_auth::AuthError;
use nearfood_commerce::CommerceError;
use nearfood_store::StoreError;
use serde_json::json;
use thiserror::Error;

/// Everything a handler can fail with. Every variant renders as
/// `{ "error": message }` with the matching status code; internal
/// variants log the cause and show an opaque message.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid email or password")]
    BadCredentials,

    #[error("Not found")]
    NotFound,

    #[error("Too many requests")]
    RateLimited,

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::BadCredentials => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(cause) = &self {
            tracing::error!(error = %cause, "request failed");
        }
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<CommerceError> for AppError {
    fn from(err: CommerceError) -> Self {
        match err {
            CommerceError::Store(store) => store.into(),
            CommerceError::EmptyCart
            | CommerceError::MissingItemInfo
            | CommerceError::InvalidQuantity(_)
            | CommerceError::QuantityExceedsLimit { .. }
            | CommerceError::RestaurantMismatch
            | CommerceError::Validation(_) => AppError::Validation(err.to_string()),
            CommerceError::Overflow => AppError::Internal(err.into()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => AppError::Unauthorized,
            AuthError::InvalidCredentials => AppError::BadCredentials,
            AuthError::Store(store) => store.into(),
            // Policy failures are the caller's problem.
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            StoreError::Unauthorized => AppError::Unauthorized,
            other => AppError::Internal(other.into()),
        }
    }
}

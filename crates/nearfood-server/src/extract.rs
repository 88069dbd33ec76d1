//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use nearfood_auth::SessionUser;
use nearfood_commerce::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, resolved from `Authorization: Bearer`.
/// Handlers that take this reject unauthenticated requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

impl AuthUser {
    pub fn user_id(&self) -> UserId {
        UserId::new(&self.0.id)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized)?;
        let user = state.auth.authenticate(bearer.token()).await?;
        Ok(AuthUser(user))
    }
}

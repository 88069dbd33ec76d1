//! Sign-up and login.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub(crate) struct Credentials {
    email: String,
    password: String,
}

pub(crate) async fn signup(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Json<Value>, AppError> {
    let session = state.auth.sign_up(&body.email, &body.password).await?;
    Ok(Json(session_payload(&session)))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Json<Value>, AppError> {
    let session = state.auth.sign_in(&body.email, &body.password).await?;
    Ok(Json(session_payload(&session)))
}

fn session_payload(session: &nearfood_auth::AuthSession) -> Value {
    json!({
        "access_token": session.access_token,
        "user": {
            "id": session.user.id,
            "email": session.user.email,
        },
    })
}

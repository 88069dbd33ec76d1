//! Demo data seeding endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::extract::AuthUser;
use crate::seed;
use crate::state::AppState;

/// `GET /api/seed`: authenticated and rate-limited; upserts the demo
/// dataset.
pub(crate) async fn run(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    if !state.seed_limiter.check(&user.0.id) {
        tracing::warn!(user_id = %user.0.id, "seed rate limit hit");
        return Err(AppError::RateLimited);
    }

    let summary = seed::run(&state.store).await?;
    Ok(Json(json!({
        "success": true,
        "seeded": summary,
    })))
}

//! NearFood HTTP server.
//!
//! A thin JSON API over the hosted table/auth backend. Handlers stay
//! small: validation and response shaping here, domain logic in
//! `nearfood-commerce`, storage behind `nearfood-store`.

pub mod config;
pub mod error;
pub mod extract;
pub mod payments;
pub mod ratelimit;
pub mod routes;
pub mod seed;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

//! HTTP route handlers, one module per resource.

use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::AppState;

mod addresses;
mod auth;
mod cart;
mod orders;
mod payments;
mod restaurants;
mod seed;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/restaurants", get(restaurants::list))
        .route("/api/restaurants/{id}/menu", get(restaurants::menu))
        .route(
            "/api/cart",
            get(cart::show).post(cart::add_item).delete(cart::clear),
        )
        .route("/api/orders", get(orders::list).post(orders::create))
        .route("/api/orders/{id}", get(orders::show).patch(orders::update))
        .route(
            "/api/addresses",
            get(addresses::list).post(addresses::create),
        )
        .route(
            "/api/addresses/{id}",
            get(addresses::show)
                .patch(addresses::update)
                .delete(addresses::remove),
        )
        .route("/api/payments/create-order", post(payments::create_order))
        .route("/api/payments/verify", post(payments::verify))
        .route("/api/seed", get(seed::run))
}

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 50;

/// Common `?page=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct PageQuery {
    page: Option<usize>,
    limit: Option<usize>,
}

impl PageQuery {
    pub(crate) fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub(crate) fn offset(&self) -> usize {
        (self.page() - 1) * self.limit()
    }
}

/// `pagination` object of a paginated list response.
pub(crate) fn pagination(query: &PageQuery, total: u64) -> Value {
    let limit = query.limit() as u64;
    json!({
        "page": query.page(),
        "limit": limit,
        "total": total,
        "total_pages": total.div_ceil(limit),
    })
}

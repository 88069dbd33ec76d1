//! Shared state handed to every handler.

use std::sync::Arc;

use nearfood_auth::AuthClient;
use nearfood_store::Store;

use crate::payments::PaymentGateway;
use crate::ratelimit::RateLimiter;

/// Per-process state. Cheap to clone; everything inside is shared.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub auth: AuthClient,
    pub payments: Arc<PaymentGateway>,
    pub seed_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(store: Store, payments: PaymentGateway) -> Self {
        Self {
            auth: AuthClient::new(store.clone()),
            store,
            payments: Arc::new(payments),
            seed_limiter: Arc::new(RateLimiter::per_minute(5)),
        }
    }

    /// State over the in-memory backend with dummy payments, for tests
    /// and local development without a configured environment.
    pub fn in_memory() -> Self {
        Self::new(Store::in_memory(), PaymentGateway::dummy())
    }
}

//! Environment-driven configuration.

use std::env;
use std::sync::Arc;

use nearfood_store::{HttpStore, HttpStoreConfig, Store};

use crate::payments::PaymentGateway;

/// Runtime configuration. Everything is optional: with no environment
/// set, the server runs on the in-memory backend with dummy payments,
/// which is exactly what local development wants.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Hosted backend base URL (`NEARFOOD_BAAS_URL`).
    pub baas_url: Option<String>,
    /// Hosted backend API key (`NEARFOOD_BAAS_KEY`).
    pub baas_key: Option<String>,
    /// Payment gateway secret key (`NEARFOOD_PAYMENT_SECRET_KEY`).
    /// Absent means dummy payment mode.
    pub payment_secret_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            baas_url: env::var("NEARFOOD_BAAS_URL").ok().filter(|s| !s.is_empty()),
            baas_key: env::var("NEARFOOD_BAAS_KEY").ok().filter(|s| !s.is_empty()),
            payment_secret_key: env::var("NEARFOOD_PAYMENT_SECRET_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }

    /// Build the store this config points at.
    pub fn build_store(&self) -> Store {
        match (&self.baas_url, &self.baas_key) {
            (Some(url), Some(key)) => {
                tracing::info!(base_url = %url, "using hosted backend");
                let http = Arc::new(HttpStore::new(HttpStoreConfig {
                    base_url: url.clone(),
                    api_key: key.clone(),
                }));
                Store::new(http.clone(), http)
            }
            _ => {
                tracing::warn!("no backend configured, using in-memory store");
                Store::in_memory()
            }
        }
    }

    pub fn build_payments(&self) -> PaymentGateway {
        match &self.payment_secret_key {
            Some(key) => PaymentGateway::live(key.clone()),
            None => {
                tracing::warn!("no payment key configured, using dummy payment mode");
                PaymentGateway::dummy()
            }
        }
    }
}

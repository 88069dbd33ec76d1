//! Client for the hosted backend-as-a-service that owns all persistent data.
//!
//! The BaaS exposes two surfaces this crate wraps:
//!
//! - a **table API**: filtered selects, inserts, updates, deletes against
//!   Postgres-backed tables, with a single-row fetch that fails with a
//!   distinguishable not-found code, and
//! - an **auth API**: password sign-up/sign-in and bearer-token session lookup.
//!
//! Both surfaces are behind traits so the server can run against the real
//! HTTP backend ([`HttpStore`]) or an in-process double ([`MemoryStore`])
//! for tests and local development.
//!
//! # Example
//!
//! ```rust,ignore
//! use nearfood_store::{Select, Store};
//!
//! let store = Store::in_memory();
//! let carts: Vec<Cart> = store
//!     .fetch_all(&Select::from("carts").eq("user_id", user_id))
//!     .await?;
//! ```

mod auth;
mod error;
mod http;
mod memory;
mod query;
mod retry;
mod store;

pub use auth::{AuthApi, AuthSession, SessionUser};
pub use error::StoreError;
pub use http::{HttpStore, HttpStoreConfig};
pub use memory::MemoryStore;
pub use query::{Filter, OrderBy, Row, Select};
pub use retry::{BackoffStrategy, RetryPolicy};
pub use store::{Store, TableStore};

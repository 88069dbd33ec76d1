//! Authentication for NearFood.
//!
//! Accounts live in the hosted backend; this crate validates credential
//! shape, calls through [`nearfood_store::AuthApi`], and flattens the
//! backend's failures into responses safe to show a caller.

mod client;
mod error;
mod policy;

pub use client::AuthClient;
pub use error::AuthError;
pub use policy::{validate_email, validate_new_password};

pub use nearfood_store::{AuthSession, SessionUser};

//! HTTP surface for the Lumen Flow notification backend.
//!
//! The notification bell UI reads and mutates notification state through
//! this API; the evaluator itself runs in the worker binary. Authentication
//! is delegated to the hosted provider -- the fronting gateway verifies the
//! session and injects the user's id as a request header, which
//! [`middleware::auth::AuthUser`] extracts.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

//! Request handlers, one module per resource. Each module exposes a
//! `router()` that the app router mounts.

pub mod health;
pub mod notifications;
pub mod settings;

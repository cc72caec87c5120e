//! Domain logic for the Lumen Flow notification backend.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the evaluator engine, the API, and any future CLI
//! tooling alike:
//!
//! - [`types`] -- shared id/timestamp aliases.
//! - [`error`] -- the domain error type.
//! - [`nudge`] -- rule kinds, severities, suppression windows, and the pure
//!   fire-condition functions behind each nudge rule.
//! - [`quiet_hours`] -- time-of-day window evaluation for notification
//!   suppression.

pub mod error;
pub mod nudge;
pub mod quiet_hours;
pub mod types;

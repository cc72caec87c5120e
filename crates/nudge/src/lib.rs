//! The notification nudge evaluator.
//!
//! This crate hosts the batch jobs that turn workspace state into
//! notifications:
//!
//! - [`NudgeEngine`] -- one evaluation pass: loads every user's notification
//!   settings, evaluates quiet hours once per user, runs each nudge rule in
//!   sequence, and writes the notifications that survive the gates.
//! - [`rules`] -- the five independent rule evaluators.
//! - [`NudgeScheduler`] -- periodic loop driving the engine.
//! - [`DigestScheduler`] -- hourly loop emitting per-user daily digests.
//! - [`RunContext`] -- injected clock + timezone, so every decision is a pure
//!   function of an explicit instant rather than ambient wall-clock calls.

pub mod context;
pub mod digest;
pub mod engine;
pub mod rules;
pub mod scheduler;

pub use context::RunContext;
pub use digest::DigestScheduler;
pub use engine::{NudgeEngine, RunSummary};
pub use scheduler::NudgeScheduler;

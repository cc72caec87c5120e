//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the writes the application performs
//!
//! Status, severity, and rule columns stay `String` at the row level; the
//! evaluator interprets them through the closed enums in `lumen_core::nudge`.

pub mod daily_focus;
pub mod document;
pub mod notification;
pub mod project;
pub mod task;

//! Task query models.
//!
//! The evaluator never reads whole task rows; its two queries are a count
//! and the overdue join below, so that projection is the only task model
//! this service carries.

use lumen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An overdue task joined to its project's name for notification copy.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OverdueTask {
    pub id: DbId,
    pub title: String,
    pub due_date: Timestamp,
    pub project_name: Option<String>,
}

/// Terminal task statuses; anything else counts as open.
pub const TASK_STATUS_COMPLETED: &str = "completed";
pub const TASK_STATUS_CANCELLED: &str = "cancelled";

//! Project entity model.

use lumen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `projects` table.
///
/// Read-only from the evaluator's perspective: the application CRUD surface
/// owns writes, the nudge rules only query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub status: String,
    pub priority: String,
    pub deadline: Option<chrono::NaiveDate>,
    pub primary_principle_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Project status column values.
pub const PROJECT_STATUS_ACTIVE: &str = "active";

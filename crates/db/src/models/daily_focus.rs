//! Daily focus plan models.

use lumen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `daily_focus_plans` table: one generated plan per user per
/// local day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyFocusPlan {
    pub id: DbId,
    pub user_id: DbId,
    pub focus_date: chrono::NaiveDate,
    pub created_at: Timestamp,
}

/// A row from the `focus_actions` table: one suggested action of a plan.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FocusAction {
    pub id: DbId,
    pub plan_id: DbId,
    pub task_id: Option<DbId>,
    pub title: String,
    pub sort_order: i32,
    pub is_completed: bool,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

//! Repository for the `daily_focus_plans` and `focus_actions` tables.

use chrono::NaiveDate;
use lumen_core::types::DbId;
use sqlx::PgPool;

use crate::models::daily_focus::{DailyFocusPlan, FocusAction};

/// Column list for `daily_focus_plans` queries.
const PLAN_COLUMNS: &str = "id, user_id, focus_date, created_at";

/// Column list for `focus_actions` queries.
const ACTION_COLUMNS: &str =
    "id, plan_id, task_id, title, sort_order, is_completed, completed_at, created_at";

/// Read-side queries over daily focus plans for the focus nudge.
pub struct DailyFocusRepo;

impl DailyFocusRepo {
    /// Find a user's generated plan for a specific local day.
    pub async fn find_for_day(
        pool: &PgPool,
        user_id: DbId,
        focus_date: NaiveDate,
    ) -> Result<Option<DailyFocusPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {PLAN_COLUMNS} FROM daily_focus_plans \
             WHERE user_id = $1 AND focus_date = $2"
        );
        sqlx::query_as::<_, DailyFocusPlan>(&query)
            .bind(user_id)
            .bind(focus_date)
            .fetch_optional(pool)
            .await
    }

    /// List a plan's actions in display order.
    pub async fn list_actions(
        pool: &PgPool,
        plan_id: DbId,
    ) -> Result<Vec<FocusAction>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTION_COLUMNS} FROM focus_actions \
             WHERE plan_id = $1 \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, FocusAction>(&query)
            .bind(plan_id)
            .fetch_all(pool)
            .await
    }
}

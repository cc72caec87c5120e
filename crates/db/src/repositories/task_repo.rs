//! Repository for the `tasks` table.

use lumen_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::task::{OverdueTask, TASK_STATUS_CANCELLED, TASK_STATUS_COMPLETED};

/// Read-side queries over tasks for the nudge rules.
pub struct TaskRepo;

impl TaskRepo {
    /// Count a project's open tasks (not completed, not cancelled).
    pub async fn count_open_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks \
             WHERE project_id = $1 AND status NOT IN ($2, $3)",
        )
        .bind(project_id)
        .bind(TASK_STATUS_COMPLETED)
        .bind(TASK_STATUS_CANCELLED)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// List a user's open tasks whose due date has passed, joined to the
    /// owning project's name for notification copy. Oldest due date first.
    pub async fn list_overdue(
        pool: &PgPool,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<Vec<OverdueTask>, sqlx::Error> {
        sqlx::query_as::<_, OverdueTask>(
            "SELECT t.id, t.title, t.due_date, p.name AS project_name \
             FROM tasks t \
             LEFT JOIN projects p ON p.id = t.project_id \
             WHERE t.user_id = $1 \
               AND t.status NOT IN ($2, $3) \
               AND t.due_date IS NOT NULL \
               AND t.due_date < $4 \
             ORDER BY t.due_date",
        )
        .bind(user_id)
        .bind(TASK_STATUS_COMPLETED)
        .bind(TASK_STATUS_CANCELLED)
        .bind(now)
        .fetch_all(pool)
        .await
    }
}

//! Repository for the `projects` table.

use lumen_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{Project, PROJECT_STATUS_ACTIVE};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, status, priority, deadline, \
                       primary_principle_id, created_at, updated_at";

/// Read-side queries over projects for the nudge rules.
pub struct ProjectRepo;

impl ProjectRepo {
    /// List a user's active projects, most recently updated first.
    ///
    /// Feeds both the deadline rule (which further filters on a non-NULL
    /// deadline) and the stale rule (which looks at `updated_at`).
    pub async fn list_active(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects \
             WHERE user_id = $1 AND status = $2 \
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(PROJECT_STATUS_ACTIVE)
            .fetch_all(pool)
            .await
    }
}

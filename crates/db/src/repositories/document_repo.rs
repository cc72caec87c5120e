//! Repository for the `documents` table.

use lumen_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::document::Document;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, title, alignment_score, category_overridden, created_at, updated_at";

/// Read-side queries over documents for the low-alignment rule.
pub struct DocumentRepo;

impl DocumentRepo {
    /// List a user's documents created since `since` whose alignment score
    /// fell below `threshold` and whose categorization the user did not
    /// override. Uncategorized documents (NULL score) are excluded.
    pub async fn list_recent_low_alignment(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
        threshold: i32,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents \
             WHERE user_id = $1 \
               AND created_at >= $2 \
               AND alignment_score IS NOT NULL \
               AND alignment_score < $3 \
               AND category_overridden = FALSE \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(user_id)
            .bind(since)
            .bind(threshold)
            .fetch_all(pool)
            .await
    }
}

//! Document entity model.

use lumen_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `documents` table.
///
/// `alignment_score` is the 0-100 principle-alignment rating written by the
/// AI categorizer; NULL until categorization has run. `category_overridden`
/// is set when the user rejected the AI's suggestion.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub alignment_score: Option<i32>,
    pub category_overridden: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

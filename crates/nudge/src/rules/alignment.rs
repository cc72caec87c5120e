//! Low-alignment rule: a document created in the last day scored poorly
//! against the user's principles and the user let the AI's categorization
//! stand.

use chrono::Duration;
use lumen_core::nudge::{self, EntityRef, RuleKind, Severity};
use lumen_core::types::DbId;
use lumen_db::models::document::Document;
use lumen_db::repositories::DocumentRepo;
use lumen_db::DbPool;

use crate::context::RunContext;
use crate::rules::Nudge;

pub async fn evaluate(
    pool: &DbPool,
    user_id: DbId,
    ctx: &RunContext,
) -> Result<Vec<Nudge>, sqlx::Error> {
    let since = ctx.now - Duration::hours(nudge::LOW_ALIGNMENT_LOOKBACK_HOURS);
    let documents = DocumentRepo::list_recent_low_alignment(
        pool,
        user_id,
        since,
        nudge::LOW_ALIGNMENT_THRESHOLD,
    )
    .await?;
    // The query already applied the fire condition; every row is a nudge.
    Ok(documents.iter().map(build).collect())
}

fn build(document: &Document) -> Nudge {
    let score = document.alignment_score.unwrap_or(0);
    Nudge {
        kind: RuleKind::LowAlignment,
        severity: Severity::Info,
        title: format!("\"{}\" scored low on alignment", document.title),
        body: format!(
            "Alignment score {score}/100. Link it to a principle or adjust its category."
        ),
        entity: Some(EntityRef::document(document.id)),
        action_url: Some(format!("/documents/{}", document.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn low_scoring_document_builds_info_nudge() {
        let document = Document {
            id: 9,
            user_id: 1,
            title: "Meeting notes".to_string(),
            alignment_score: Some(35),
            category_overridden: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let n = build(&document);
        assert_eq!(n.severity, Severity::Info);
        assert_eq!(n.title, "\"Meeting notes\" scored low on alignment");
        assert_eq!(
            n.body,
            "Alignment score 35/100. Link it to a principle or adjust its category."
        );
        assert_eq!(n.entity, Some(EntityRef::document(9)));
        assert_eq!(n.action_url.as_deref(), Some("/documents/9"));
    }
}

//! The nudge rule evaluators.
//!
//! Each rule is independent and stateless across runs: it queries its
//! candidate rows, derives the fire condition through the pure functions in
//! `lumen_core::nudge`, and returns candidate [`Nudge`]s. The engine owns
//! everything downstream -- quiet hours, critical-only, mutes, duplicate
//! suppression, and the actual write -- so a rule never needs to know about
//! gating.
//!
//! The query half of each rule needs a database; the row-to-candidate half
//! is a pure function with its own unit tests.

use lumen_core::nudge::{EntityRef, RuleKind, Severity};
use lumen_db::models::notification::NotificationSettings;
use lumen_db::DbPool;

use crate::context::RunContext;

pub mod alignment;
pub mod deadline;
pub mod focus;
pub mod overdue;
pub mod stale;

/// A candidate notification produced by a rule, before gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nudge {
    pub kind: RuleKind,
    pub severity: Severity,
    pub title: String,
    pub body: String,
    /// The subject entity, when the rule is about one. User-scoped rules
    /// (the focus nudge) leave this empty, which also scopes their
    /// duplicate suppression to user + rule.
    pub entity: Option<EntityRef>,
    /// Deep link rendered by the notification bell UI.
    pub action_url: Option<String>,
}

/// Evaluate one rule for one user.
pub async fn evaluate(
    kind: RuleKind,
    pool: &DbPool,
    settings: &NotificationSettings,
    ctx: &RunContext,
) -> Result<Vec<Nudge>, sqlx::Error> {
    let user_id = settings.user_id;
    match kind {
        RuleKind::DeadlineApproaching => deadline::evaluate(pool, user_id, ctx).await,
        RuleKind::TaskOverdue => overdue::evaluate(pool, user_id, ctx).await,
        RuleKind::ProjectStale => stale::evaluate(pool, user_id, ctx).await,
        RuleKind::FocusNudge => focus::evaluate(pool, user_id, ctx).await,
        RuleKind::LowAlignment => alignment::evaluate(pool, user_id, ctx).await,
        // Driven by its own scheduler, never by the rule pass.
        RuleKind::DailyDigest => Ok(Vec::new()),
    }
}

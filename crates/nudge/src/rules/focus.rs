//! Daily-focus rule: today's generated plan exists but nothing on it has
//! been done, checked once in the mid-afternoon window.

use lumen_core::nudge::{self, RuleKind, Severity};
use lumen_core::types::DbId;
use lumen_db::models::daily_focus::FocusAction;
use lumen_db::repositories::DailyFocusRepo;
use lumen_db::DbPool;

use crate::context::RunContext;
use crate::rules::Nudge;

pub async fn evaluate(
    pool: &DbPool,
    user_id: DbId,
    ctx: &RunContext,
) -> Result<Vec<Nudge>, sqlx::Error> {
    // Outside 14:00-15:00 local this rule is a no-op, so the nudge lands
    // when there is still afternoon left to act on it.
    if !nudge::in_focus_nudge_window(ctx.local_time()) {
        return Ok(Vec::new());
    }

    let Some(plan) = DailyFocusRepo::find_for_day(pool, user_id, ctx.today()).await? else {
        return Ok(Vec::new());
    };
    let actions = DailyFocusRepo::list_actions(pool, plan.id).await?;
    Ok(build(&actions).into_iter().collect())
}

/// Fire only when the plan has actions and none is completed.
///
/// No subject entity: the nudge is about the user's day, and suppression is
/// scoped to user + rule.
fn build(actions: &[FocusAction]) -> Option<Nudge> {
    if actions.is_empty() || actions.iter().any(|a| a.is_completed) {
        return None;
    }

    Some(Nudge {
        kind: RuleKind::FocusNudge,
        severity: Severity::Info,
        title: "Your daily focus is waiting".to_string(),
        body: format!(
            "None of today's {} focus actions are done yet.",
            actions.len()
        ),
        entity: None,
        action_url: Some("/daily-focus".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn action(id: i64, done: bool) -> FocusAction {
        FocusAction {
            id,
            plan_id: 1,
            task_id: None,
            title: format!("Action {id}"),
            sort_order: id as i32,
            is_completed: done,
            completed_at: done.then(Utc::now),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn untouched_plan_fires() {
        let n = build(&[action(1, false), action(2, false), action(3, false)]).unwrap();
        assert_eq!(n.severity, Severity::Info);
        assert_eq!(n.body, "None of today's 3 focus actions are done yet.");
        assert_eq!(n.entity, None);
    }

    #[test]
    fn one_completed_action_silences_the_nudge() {
        assert_matches!(build(&[action(1, true), action(2, false)]), None);
    }

    #[test]
    fn empty_plan_never_fires() {
        assert_matches!(build(&[]), None);
    }
}

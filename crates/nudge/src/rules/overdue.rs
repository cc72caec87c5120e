//! Overdue-task rule: an open task's due date has passed.

use lumen_core::nudge::{self, EntityRef, RuleKind};
use lumen_core::types::{DbId, Timestamp};
use lumen_db::models::task::OverdueTask;
use lumen_db::repositories::TaskRepo;
use lumen_db::DbPool;

use crate::context::RunContext;
use crate::rules::Nudge;

pub async fn evaluate(
    pool: &DbPool,
    user_id: DbId,
    ctx: &RunContext,
) -> Result<Vec<Nudge>, sqlx::Error> {
    let tasks = TaskRepo::list_overdue(pool, user_id, ctx.now).await?;
    Ok(tasks.iter().map(|t| build(t, ctx.now)).collect())
}

/// Turn one overdue task into a candidate nudge. The query already filtered,
/// so every row fires; only the severity varies.
fn build(task: &OverdueTask, now: Timestamp) -> Nudge {
    let hours_overdue = (now - task.due_date).num_hours();
    let severity = nudge::overdue_severity(hours_overdue);

    let context = match &task.project_name {
        Some(project) => format!(" in \"{project}\""),
        None => String::new(),
    };

    Nudge {
        kind: RuleKind::TaskOverdue,
        severity,
        title: format!("\"{}\" is overdue", task.title),
        body: format!("Due {} ago{context}.", overdue_phrase(hours_overdue)),
        entity: Some(EntityRef::task(task.id)),
        action_url: Some(format!("/tasks/{}", task.id)),
    }
}

/// Human phrasing for how long ago the due date was.
fn overdue_phrase(hours: i64) -> String {
    match hours {
        0 => "less than an hour".to_string(),
        1 => "an hour".to_string(),
        h if h < 24 => format!("{h} hours"),
        h if h < 48 => "a day".to_string(),
        h => format!("{} days", h / 24),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use lumen_core::nudge::Severity;

    fn overdue_by(hours: i64, project: Option<&str>) -> (OverdueTask, Timestamp) {
        let now = Utc::now();
        let task = OverdueTask {
            id: 5,
            title: "File taxes".to_string(),
            due_date: now - Duration::hours(hours),
            project_name: project.map(str::to_string),
        };
        (task, now)
    }

    #[test]
    fn one_hour_overdue_is_warn() {
        let (task, now) = overdue_by(1, None);
        let n = build(&task, now);
        assert_eq!(n.severity, Severity::Warn);
        assert_eq!(n.title, "\"File taxes\" is overdue");
        assert_eq!(n.body, "Due an hour ago.");
    }

    #[test]
    fn exactly_24h_overdue_is_warn() {
        let (task, now) = overdue_by(24, None);
        assert_eq!(build(&task, now).severity, Severity::Warn);
    }

    #[test]
    fn twenty_five_hours_overdue_is_critical() {
        let (task, now) = overdue_by(25, None);
        let n = build(&task, now);
        assert_eq!(n.severity, Severity::Critical);
        assert_eq!(n.body, "Due a day ago.");
    }

    #[test]
    fn project_name_lands_in_body() {
        let (task, now) = overdue_by(3, Some("Admin"));
        assert_eq!(build(&task, now).body, "Due 3 hours ago in \"Admin\".");
    }

    #[test]
    fn multi_day_phrasing() {
        assert_eq!(overdue_phrase(0), "less than an hour");
        assert_eq!(overdue_phrase(23), "23 hours");
        assert_eq!(overdue_phrase(47), "a day");
        assert_eq!(overdue_phrase(72), "3 days");
    }
}

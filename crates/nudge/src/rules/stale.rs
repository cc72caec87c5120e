//! Stale-project rule: an active project hasn't been touched for days.

use lumen_core::nudge::{self, EntityRef, RuleKind, Severity};
use lumen_core::types::{DbId, Timestamp};
use lumen_db::models::project::Project;
use lumen_db::repositories::ProjectRepo;
use lumen_db::DbPool;

use crate::context::RunContext;
use crate::rules::Nudge;

pub async fn evaluate(
    pool: &DbPool,
    user_id: DbId,
    ctx: &RunContext,
) -> Result<Vec<Nudge>, sqlx::Error> {
    let projects = ProjectRepo::list_active(pool, user_id).await?;
    Ok(projects.iter().filter_map(|p| build(p, ctx.now)).collect())
}

/// Turn one active project into a candidate nudge, if it has gone stale.
fn build(project: &Project, now: Timestamp) -> Option<Nudge> {
    let days_idle = (now - project.updated_at).num_days();
    if !nudge::is_stale(days_idle) {
        return None;
    }

    Some(Nudge {
        kind: RuleKind::ProjectStale,
        severity: Severity::Info,
        title: format!("\"{}\" has gone quiet", project.name),
        body: format!("No activity for {days_idle} days. Still on track?"),
        entity: Some(EntityRef::project(project.id)),
        action_url: Some(format!("/projects/{}", project.id)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    fn idle_project(days: i64) -> (Project, Timestamp) {
        let now = Utc::now();
        let project = Project {
            id: 3,
            user_id: 1,
            name: "Garden".to_string(),
            status: "active".to_string(),
            priority: "low".to_string(),
            deadline: None,
            primary_principle_id: None,
            created_at: now - Duration::days(30),
            updated_at: now - Duration::days(days),
        };
        (project, now)
    }

    #[test]
    fn four_idle_days_does_not_fire() {
        let (project, now) = idle_project(4);
        assert_matches!(build(&project, now), None);
    }

    #[test]
    fn five_idle_days_fires_info() {
        let (project, now) = idle_project(5);
        let n = build(&project, now).unwrap();
        assert_eq!(n.severity, Severity::Info);
        assert_eq!(n.title, "\"Garden\" has gone quiet");
        assert_eq!(n.body, "No activity for 5 days. Still on track?");
        assert_eq!(n.entity, Some(EntityRef::project(3)));
    }
}

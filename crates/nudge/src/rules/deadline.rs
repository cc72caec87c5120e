//! Project-deadline rule: an active project is due within three days and
//! still has open tasks.

use lumen_core::nudge::{self, EntityRef, RuleKind};
use lumen_core::types::DbId;
use lumen_db::models::project::Project;
use lumen_db::repositories::{ProjectRepo, TaskRepo};
use lumen_db::DbPool;

use crate::context::RunContext;
use crate::rules::Nudge;

pub async fn evaluate(
    pool: &DbPool,
    user_id: DbId,
    ctx: &RunContext,
) -> Result<Vec<Nudge>, sqlx::Error> {
    let projects = ProjectRepo::list_active(pool, user_id).await?;

    let mut nudges = Vec::new();
    for project in &projects {
        let Some(deadline) = project.deadline else {
            continue;
        };
        let days_until = (deadline - ctx.today()).num_days();
        // Don't bother counting tasks for projects outside the horizon.
        if !(0..=nudge::DEADLINE_HORIZON_DAYS).contains(&days_until) {
            continue;
        }
        let open_tasks = TaskRepo::count_open_for_project(pool, project.id).await?;
        if let Some(n) = build(project, days_until, open_tasks) {
            nudges.push(n);
        }
    }
    Ok(nudges)
}

/// Turn one in-horizon project into a candidate nudge, if it fires.
fn build(project: &Project, days_until: i64, open_tasks: i64) -> Option<Nudge> {
    let severity = nudge::deadline_nudge(days_until, open_tasks)?;

    let when = match days_until {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {n} days"),
    };
    let tasks_word = if open_tasks == 1 { "task" } else { "tasks" };

    Some(Nudge {
        kind: RuleKind::DeadlineApproaching,
        severity,
        title: format!("\"{}\" is due {when}", project.name),
        body: format!("{open_tasks} open {tasks_word} left before the deadline."),
        entity: Some(EntityRef::project(project.id)),
        action_url: Some(format!("/projects/{}", project.id)),
    })
}

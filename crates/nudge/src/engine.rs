//! The evaluation engine: per-user orchestration and the delivery pipeline.

use lumen_core::nudge::{should_deliver, EntityRef, RuleKind};
use lumen_core::quiet_hours;
use lumen_core::types::{DbId, Timestamp};
use lumen_db::models::notification::{NewNotification, NotificationSettings};
use lumen_db::repositories::{NotificationRepo, NotificationSettingsRepo};
use lumen_db::DbPool;

use crate::context::RunContext;
use crate::rules::{self, Nudge};

/// Counters reported after each evaluation pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    /// Users whose settings row was loaded and whose rules ran.
    pub users_evaluated: usize,
    /// Notifications actually written.
    pub written: usize,
    /// Rule evaluations that errored and were skipped.
    pub rule_failures: usize,
}

/// One-pass notification nudge evaluator.
///
/// Users are processed sequentially, and within one user the rules run in
/// [`RuleKind::NUDGE_RULES`] order. A failure anywhere is confined to that
/// rule for that user; the pass always visits everyone. Concurrent passes
/// are not locked against: two overlapping runs can both clear the
/// suppression probe and double-write, which costs a duplicate alert and
/// nothing else.
pub struct NudgeEngine {
    pool: DbPool,
    tz: chrono_tz::Tz,
}

impl NudgeEngine {
    pub fn new(pool: DbPool, tz: chrono_tz::Tz) -> Self {
        Self { pool, tz }
    }

    /// Run one full evaluation pass at the given instant.
    ///
    /// Errors only if the initial settings query fails -- with no settings
    /// rows there is no user population to evaluate.
    pub async fn run(&self, now: Timestamp) -> Result<RunSummary, sqlx::Error> {
        let ctx = RunContext::new(now, self.tz);
        let all_settings = NotificationSettingsRepo::list_all(&self.pool).await?;

        let mut summary = RunSummary::default();
        for settings in &all_settings {
            if !settings.nudges_enabled {
                tracing::debug!(user_id = settings.user_id, "Nudges disabled, skipping user");
                continue;
            }
            summary.users_evaluated += 1;

            let in_quiet = quiet_hours::is_in_quiet_hours(
                settings.quiet_hours_start.as_deref(),
                settings.quiet_hours_end.as_deref(),
                ctx.local_time(),
            );

            for kind in RuleKind::NUDGE_RULES {
                match rules::evaluate(kind, &self.pool, settings, &ctx).await {
                    Ok(nudges) => {
                        for nudge in nudges {
                            if self.deliver(settings, in_quiet, &ctx, &nudge).await {
                                summary.written += 1;
                            }
                        }
                    }
                    Err(e) => {
                        summary.rule_failures += 1;
                        tracing::error!(
                            user_id = settings.user_id,
                            rule = kind.as_str(),
                            error = %e,
                            "Rule evaluation failed, continuing with remaining rules"
                        );
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Push a candidate nudge through the delivery gates and, if it
    /// survives, write it. Returns whether a row was inserted.
    ///
    /// Gate order: severity gate (quiet hours / critical-only), muted
    /// entities, duplicate suppression, insert. Write failures are logged
    /// and swallowed -- there is no retry, the next run re-derives the nudge.
    pub(crate) async fn deliver(
        &self,
        settings: &NotificationSettings,
        in_quiet: bool,
        ctx: &RunContext,
        nudge: &Nudge,
    ) -> bool {
        if !should_deliver(nudge.severity, in_quiet, settings.critical_only) {
            tracing::debug!(
                user_id = settings.user_id,
                rule = nudge.kind.as_str(),
                severity = nudge.severity.as_str(),
                in_quiet,
                "Nudge withheld by delivery gate"
            );
            return false;
        }

        if is_muted(settings, nudge.entity.as_ref()) {
            tracing::debug!(
                user_id = settings.user_id,
                rule = nudge.kind.as_str(),
                "Subject entity is muted"
            );
            return false;
        }

        let entity_id = nudge.entity.as_ref().map(|e| e.entity_id);
        if self
            .is_duplicate(settings.user_id, nudge.kind, entity_id, ctx)
            .await
        {
            return false;
        }

        let input = NewNotification {
            user_id: settings.user_id,
            rule: nudge.kind.as_str(),
            title: &nudge.title,
            body: &nudge.body,
            severity: nudge.severity.as_str(),
            entity_type: nudge.entity.as_ref().map(|e| e.entity_type.as_str()),
            entity_id,
            action_url: nudge.action_url.as_deref(),
        };
        match NotificationRepo::create(&self.pool, &input).await {
            Ok(created) => {
                tracing::info!(
                    user_id = settings.user_id,
                    rule = nudge.kind.as_str(),
                    severity = nudge.severity.as_str(),
                    notification_id = created.id,
                    "Notification written"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    user_id = settings.user_id,
                    rule = nudge.kind.as_str(),
                    error = %e,
                    "Failed to write notification"
                );
                false
            }
        }
    }

    /// Duplicate-suppression check.
    ///
    /// Fails open: a probe error is logged and treated as "not a
    /// duplicate", trading a possible repeat alert for guaranteed delivery.
    pub(crate) async fn is_duplicate(
        &self,
        user_id: DbId,
        kind: RuleKind,
        entity_id: Option<DbId>,
        ctx: &RunContext,
    ) -> bool {
        let since = ctx.now - kind.suppression_window();
        match NotificationRepo::exists_since(&self.pool, user_id, kind.as_str(), entity_id, since)
            .await
        {
            Ok(duplicate) => duplicate,
            Err(e) => {
                tracing::error!(
                    user_id,
                    rule = kind.as_str(),
                    error = %e,
                    "Duplicate check failed, treating as not duplicate"
                );
                false
            }
        }
    }
}

/// Whether the nudge's subject entity appears in the user's mute list.
///
/// Nudges with no subject entity cannot be muted. An unparseable
/// `muted_entities` column mutes nothing.
fn is_muted(settings: &NotificationSettings, entity: Option<&EntityRef>) -> bool {
    let Some(entity) = entity else {
        return false;
    };
    let muted: Vec<EntityRef> =
        serde_json::from_value(settings.muted_entities.clone()).unwrap_or_default();
    muted.iter().any(|m| m == entity)
}

//! Daily digest scheduler.
//!
//! Runs hourly. A user is due when they enabled the digest, the local hour
//! matches their configured delivery time, and no digest was written inside
//! the suppression window. A due digest is itself a notification: one
//! `daily_digest` row summarizing what accumulated unread since the last
//! one. The digest is its own opt-in, so it ignores quiet hours and the
//! critical-only flag.

use std::time::Duration;

use chrono::{Timelike, Utc};
use lumen_core::nudge::RuleKind;
use lumen_core::quiet_hours;
use lumen_core::types::Timestamp;
use lumen_db::models::notification::{NewNotification, NotificationSettings};
use lumen_db::repositories::{NotificationRepo, NotificationSettingsRepo};
use lumen_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::context::RunContext;

/// How often the scheduler polls for due digests.
const DIGEST_CHECK_INTERVAL: Duration = Duration::from_secs(3600);

/// Background service that delivers daily digest notifications.
pub struct DigestScheduler {
    pool: DbPool,
    tz: chrono_tz::Tz,
}

impl DigestScheduler {
    pub fn new(pool: DbPool, tz: chrono_tz::Tz) -> Self {
        Self { pool, tz }
    }

    /// Run the digest loop until `cancel` is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = DIGEST_CHECK_INTERVAL.as_secs(),
            "Digest scheduler started"
        );

        let mut interval = tokio::time::interval(DIGEST_CHECK_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Digest scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.process_digests(Utc::now()).await {
                        tracing::error!(error = %e, "Failed to process digests");
                    }
                }
            }
        }
    }

    /// Find every user due for a digest at `now` and deliver each one,
    /// isolating per-user failures.
    pub async fn process_digests(&self, now: Timestamp) -> Result<usize, sqlx::Error> {
        let ctx = RunContext::new(now, self.tz);
        let all_settings = NotificationSettingsRepo::list_all(&self.pool).await?;

        let mut sent = 0;
        for settings in &all_settings {
            if !digest_due(settings, &ctx) {
                continue;
            }
            match self.send_digest(settings, &ctx).await {
                Ok(true) => sent += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(
                        user_id = settings.user_id,
                        error = %e,
                        "Failed to send digest for user"
                    );
                }
            }
        }

        if sent > 0 {
            tracing::info!(sent, "Digest deliveries processed");
        }
        Ok(sent)
    }

    /// Deliver a digest for a single user.
    ///
    /// Skips without marking anything when a digest already exists in the
    /// window or there is nothing unread to summarize.
    async fn send_digest(
        &self,
        settings: &NotificationSettings,
        ctx: &RunContext,
    ) -> Result<bool, sqlx::Error> {
        let user_id = settings.user_id;
        let since = ctx.now - RuleKind::DailyDigest.suppression_window();
        if NotificationRepo::exists_since(
            &self.pool,
            user_id,
            RuleKind::DailyDigest.as_str(),
            None,
            since,
        )
        .await?
        {
            return Ok(false);
        }

        let window_start = settings
            .digest_last_sent_at
            .unwrap_or(ctx.now - chrono::Duration::hours(24));
        let unread = NotificationRepo::unread_count_since(&self.pool, user_id, window_start).await?;
        if unread == 0 {
            return Ok(false);
        }

        let plural = if unread == 1 {
            "notification"
        } else {
            "notifications"
        };
        let body = format!("{unread} unread {plural} since your last digest.");
        let input = NewNotification {
            user_id,
            rule: RuleKind::DailyDigest.as_str(),
            title: "Your daily summary",
            body: &body,
            severity: lumen_core::nudge::Severity::Info.as_str(),
            entity_type: None,
            entity_id: None,
            action_url: Some("/notifications"),
        };
        NotificationRepo::create(&self.pool, &input).await?;
        NotificationSettingsRepo::mark_digest_sent(&self.pool, user_id).await?;

        tracing::info!(user_id, unread, "Digest delivered");
        Ok(true)
    }
}

/// Whether this settings row wants a digest at the context's local hour.
///
/// A missing or malformed `digest_time` never comes due.
fn digest_due(settings: &NotificationSettings, ctx: &RunContext) -> bool {
    if !settings.digest_enabled {
        return false;
    }
    let Some(at) = settings
        .digest_time
        .as_deref()
        .and_then(quiet_hours::parse_time)
    else {
        return false;
    };
    ctx.local_time().hour() == at.hour()
}

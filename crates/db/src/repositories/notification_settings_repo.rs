//! Repository for the `notification_settings` table.

use lumen_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{NotificationSettings, UpdateNotificationSettings};

/// Column list for `notification_settings` queries.
const COLUMNS: &str = "id, user_id, quiet_hours_start, quiet_hours_end, in_app_enabled, \
    email_enabled, digest_enabled, digest_time, digest_last_sent_at, nudges_enabled, \
    critical_only, muted_entities, created_at, updated_at";

/// Queries over per-user notification settings.
pub struct NotificationSettingsRepo;

impl NotificationSettingsRepo {
    /// List every user's settings row.
    ///
    /// This is how the evaluator selects its user population: a user without
    /// a settings row has never opened the app's notification surface and is
    /// not nudged.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<NotificationSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_settings ORDER BY user_id");
        sqlx::query_as::<_, NotificationSettings>(&query)
            .fetch_all(pool)
            .await
    }

    /// Get a user's settings row, if one exists.
    pub async fn get(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<NotificationSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_settings WHERE user_id = $1");
        sqlx::query_as::<_, NotificationSettings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Get a user's settings, creating the default row on first access.
    ///
    /// `ON CONFLICT DO NOTHING` plus a re-select keeps this safe against a
    /// concurrent first access for the same user.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<NotificationSettings, sqlx::Error> {
        sqlx::query(
            "INSERT INTO notification_settings (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM notification_settings WHERE user_id = $1");
        sqlx::query_as::<_, NotificationSettings>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Partially update a user's settings. Only non-`None` fields in `input`
    /// are applied. The row must already exist (use [`Self::get_or_create`]
    /// first on the read path).
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateNotificationSettings,
    ) -> Result<Option<NotificationSettings>, sqlx::Error> {
        let query = format!(
            "UPDATE notification_settings SET \
                quiet_hours_start = COALESCE($2, quiet_hours_start), \
                quiet_hours_end = COALESCE($3, quiet_hours_end), \
                in_app_enabled = COALESCE($4, in_app_enabled), \
                email_enabled = COALESCE($5, email_enabled), \
                digest_enabled = COALESCE($6, digest_enabled), \
                digest_time = COALESCE($7, digest_time), \
                nudges_enabled = COALESCE($8, nudges_enabled), \
                critical_only = COALESCE($9, critical_only), \
                muted_entities = COALESCE($10, muted_entities), \
                updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationSettings>(&query)
            .bind(user_id)
            .bind(&input.quiet_hours_start)
            .bind(&input.quiet_hours_end)
            .bind(input.in_app_enabled)
            .bind(input.email_enabled)
            .bind(input.digest_enabled)
            .bind(&input.digest_time)
            .bind(input.nudges_enabled)
            .bind(input.critical_only)
            .bind(&input.muted_entities)
            .fetch_optional(pool)
            .await
    }

    /// Update the `digest_last_sent_at` timestamp to now for a specific user.
    pub async fn mark_digest_sent(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_settings SET digest_last_sent_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}

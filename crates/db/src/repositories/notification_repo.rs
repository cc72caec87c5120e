//! Repository for the `notifications` table.

use lumen_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::notification::{NewNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, rule, title, body, severity, entity_type, \
                       entity_id, action_url, read_at, created_at";

/// Queries over emitted notifications: the writer's insert, the duplicate
/// suppression probe, and the read-state operations behind the API.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewNotification<'_>,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications \
                (user_id, rule, title, body, severity, entity_type, entity_id, action_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(input.rule)
            .bind(input.title)
            .bind(input.body)
            .bind(input.severity)
            .bind(input.entity_type)
            .bind(input.entity_id)
            .bind(input.action_url)
            .fetch_one(pool)
            .await
    }

    /// Duplicate-suppression probe: does a notification for this user and
    /// rule -- and, when given, the same subject entity -- exist at or after
    /// `since`?
    ///
    /// With `entity_id = None` the probe is scoped to user + rule only,
    /// which is what user-scoped rules (the focus nudge, the digest) need.
    pub async fn exists_since(
        pool: &PgPool,
        user_id: DbId,
        rule: &str,
        entity_id: Option<DbId>,
        since: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = match entity_id {
            Some(entity_id) => {
                sqlx::query_scalar(
                    "SELECT EXISTS ( \
                         SELECT 1 FROM notifications \
                         WHERE user_id = $1 AND rule = $2 \
                           AND entity_id = $3 AND created_at >= $4)",
                )
                .bind(user_id)
                .bind(rule)
                .bind(entity_id)
                .bind(since)
                .fetch_one(pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT EXISTS ( \
                         SELECT 1 FROM notifications \
                         WHERE user_id = $1 AND rule = $2 AND created_at >= $3)",
                )
                .bind(user_id)
                .bind(rule)
                .bind(since)
                .fetch_one(pool)
                .await?
            }
        };
        Ok(exists)
    }

    /// List notifications for a user, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with no `read_at`
    /// are returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND read_at IS NULL"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if an unread notification was found for the given user
    /// and updated, `false` otherwise.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND read_at IS NULL",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a single notification as unread again.
    pub async fn mark_unread(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NULL \
             WHERE id = $1 AND user_id = $2 AND read_at IS NOT NULL",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked read.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() \
             WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Get the number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Count a user's unread notifications created at or after `since`.
    /// Feeds the daily digest summary.
    pub async fn unread_count_since(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE user_id = $1 AND read_at IS NULL AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Delete a notification. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(notification_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

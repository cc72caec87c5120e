//! Integration tests for the notification repositories.
//!
//! Exercises the repository layer against a real database:
//! - Settings defaults on first access and partial updates
//! - The duplicate-suppression probe's entity scoping and window edge
//! - Read-state transitions (read, unread, read-all, delete)

use chrono::{Duration, Utc};
use sqlx::PgPool;

use lumen_db::models::notification::{NewNotification, UpdateNotificationSettings};
use lumen_db::repositories::{NotificationRepo, NotificationSettingsRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn overdue_notification(user_id: i64, entity_id: Option<i64>) -> NewNotification<'static> {
    NewNotification {
        user_id,
        rule: "task_overdue",
        title: "\"File taxes\" is overdue",
        body: "Due 3 hours ago.",
        severity: "warn",
        entity_type: entity_id.map(|_| "task"),
        entity_id,
        action_url: None,
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn settings_created_with_defaults_on_first_access(pool: PgPool) {
    let user_id = create_user(&pool, "ada@example.com").await;

    let settings = NotificationSettingsRepo::get_or_create(&pool, user_id)
        .await
        .unwrap();
    assert!(settings.nudges_enabled);
    assert!(settings.in_app_enabled);
    assert!(!settings.critical_only);
    assert!(!settings.digest_enabled);
    assert_eq!(settings.quiet_hours_start, None);
    assert_eq!(settings.muted_entities, serde_json::json!([]));

    // Second access returns the same row, not a new one.
    let again = NotificationSettingsRepo::get_or_create(&pool, user_id)
        .await
        .unwrap();
    assert_eq!(again.id, settings.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn settings_partial_update_leaves_other_fields(pool: PgPool) {
    let user_id = create_user(&pool, "ada@example.com").await;
    NotificationSettingsRepo::get_or_create(&pool, user_id)
        .await
        .unwrap();

    let first = UpdateNotificationSettings {
        quiet_hours_start: Some("21:00".to_string()),
        quiet_hours_end: Some("08:00".to_string()),
        ..Default::default()
    };
    NotificationSettingsRepo::update(&pool, user_id, &first)
        .await
        .unwrap()
        .unwrap();

    let second = UpdateNotificationSettings {
        critical_only: Some(true),
        ..Default::default()
    };
    let updated = NotificationSettingsRepo::update(&pool, user_id, &second)
        .await
        .unwrap()
        .unwrap();

    assert!(updated.critical_only);
    assert_eq!(updated.quiet_hours_start.as_deref(), Some("21:00"));
    assert_eq!(updated.quiet_hours_end.as_deref(), Some("08:00"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_without_row_returns_none(pool: PgPool) {
    let user_id = create_user(&pool, "ada@example.com").await;
    let input = UpdateNotificationSettings {
        critical_only: Some(true),
        ..Default::default()
    };
    let updated = NotificationSettingsRepo::update(&pool, user_id, &input)
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_all_returns_every_settings_row(pool: PgPool) {
    let a = create_user(&pool, "a@example.com").await;
    let b = create_user(&pool, "b@example.com").await;
    NotificationSettingsRepo::get_or_create(&pool, a).await.unwrap();
    NotificationSettingsRepo::get_or_create(&pool, b).await.unwrap();

    let all = NotificationSettingsRepo::list_all(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].user_id, a);
    assert_eq!(all[1].user_id, b);
}

// ---------------------------------------------------------------------------
// Duplicate-suppression probe
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn probe_matches_user_rule_and_entity(pool: PgPool) {
    let user_id = create_user(&pool, "ada@example.com").await;
    NotificationRepo::create(&pool, &overdue_notification(user_id, Some(5)))
        .await
        .unwrap();

    let since = Utc::now() - Duration::hours(6);

    // Same entity: duplicate.
    assert!(
        NotificationRepo::exists_since(&pool, user_id, "task_overdue", Some(5), since)
            .await
            .unwrap()
    );
    // Different entity: clear.
    assert!(
        !NotificationRepo::exists_since(&pool, user_id, "task_overdue", Some(6), since)
            .await
            .unwrap()
    );
    // Different rule: clear.
    assert!(
        !NotificationRepo::exists_since(&pool, user_id, "project_stale", Some(5), since)
            .await
            .unwrap()
    );
    // Entityless probe scopes to user + rule only, so it sees the row.
    assert!(
        NotificationRepo::exists_since(&pool, user_id, "task_overdue", None, since)
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn probe_ignores_rows_older_than_window(pool: PgPool) {
    let user_id = create_user(&pool, "ada@example.com").await;
    NotificationRepo::create(&pool, &overdue_notification(user_id, Some(5)))
        .await
        .unwrap();

    // A window starting after the insert sees nothing.
    let since = Utc::now() + Duration::minutes(1);
    assert!(
        !NotificationRepo::exists_since(&pool, user_id, "task_overdue", Some(5), since)
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn probe_is_scoped_per_user(pool: PgPool) {
    let ada = create_user(&pool, "ada@example.com").await;
    let ben = create_user(&pool, "ben@example.com").await;
    NotificationRepo::create(&pool, &overdue_notification(ada, Some(5)))
        .await
        .unwrap();

    let since = Utc::now() - Duration::hours(6);
    assert!(
        !NotificationRepo::exists_since(&pool, ben, "task_overdue", Some(5), since)
            .await
            .unwrap()
    );
}

// ---------------------------------------------------------------------------
// Read-state transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn read_state_flow(pool: PgPool) {
    let user_id = create_user(&pool, "ada@example.com").await;
    let first = NotificationRepo::create(&pool, &overdue_notification(user_id, Some(1)))
        .await
        .unwrap();
    NotificationRepo::create(&pool, &overdue_notification(user_id, Some(2)))
        .await
        .unwrap();

    assert_eq!(NotificationRepo::unread_count(&pool, user_id).await.unwrap(), 2);

    // Mark one read; it drops out of the unread listing.
    assert!(NotificationRepo::mark_read(&pool, first.id, user_id).await.unwrap());
    assert_eq!(NotificationRepo::unread_count(&pool, user_id).await.unwrap(), 1);
    let unread = NotificationRepo::list_for_user(&pool, user_id, true, 50, 0)
        .await
        .unwrap();
    assert_eq!(unread.len(), 1);
    assert_ne!(unread[0].id, first.id);

    // Marking an already-read row again reports not-found.
    assert!(!NotificationRepo::mark_read(&pool, first.id, user_id).await.unwrap());

    // Back to unread.
    assert!(NotificationRepo::mark_unread(&pool, first.id, user_id).await.unwrap());
    assert_eq!(NotificationRepo::unread_count(&pool, user_id).await.unwrap(), 2);

    // Read-all clears everything.
    assert_eq!(NotificationRepo::mark_all_read(&pool, user_id).await.unwrap(), 2);
    assert_eq!(NotificationRepo::unread_count(&pool, user_id).await.unwrap(), 0);

    // Delete is scoped to the owning user.
    let stranger = create_user(&pool, "ben@example.com").await;
    assert!(!NotificationRepo::delete(&pool, first.id, stranger).await.unwrap());
    assert!(NotificationRepo::delete(&pool, first.id, user_id).await.unwrap());
}

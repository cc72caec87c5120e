//! End-to-end tests for the daily digest scheduler.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use lumen_db::models::notification::{NewNotification, UpdateNotificationSettings};
use lumen_db::repositories::{NotificationRepo, NotificationSettingsRepo};
use lumen_nudge::DigestScheduler;

const TZ: chrono_tz::Tz = chrono_tz::Australia::Melbourne;

async fn create_digest_user(pool: &PgPool, digest_time: &str) -> i64 {
    let user_id: i64 = sqlx::query_scalar("INSERT INTO users (email) VALUES ($1) RETURNING id")
        .bind("ada@example.com")
        .fetch_one(pool)
        .await
        .unwrap();
    NotificationSettingsRepo::get_or_create(pool, user_id)
        .await
        .unwrap();
    NotificationSettingsRepo::update(
        pool,
        user_id,
        &UpdateNotificationSettings {
            digest_enabled: Some(true),
            digest_time: Some(digest_time.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    user_id
}

async fn insert_unread(pool: &PgPool, user_id: i64) {
    NotificationRepo::create(
        pool,
        &NewNotification {
            user_id,
            rule: "project_stale",
            title: "\"Garden\" has gone quiet",
            body: "No activity for 6 days. Still on track?",
            severity: "info",
            entity_type: Some("project"),
            entity_id: Some(1),
            action_url: None,
        },
    )
    .await
    .unwrap();
}

/// The current local hour formatted as the user's digest time.
fn current_local_hour() -> String {
    Utc::now().with_timezone(&TZ).format("%H:00").to_string()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn due_digest_summarizes_unread_and_marks_sent(pool: PgPool) {
    let user_id = create_digest_user(&pool, &current_local_hour()).await;
    insert_unread(&pool, user_id).await;

    let scheduler = DigestScheduler::new(pool.clone(), TZ);
    let sent = scheduler.process_digests(Utc::now()).await.unwrap();
    assert_eq!(sent, 1);

    let notifications = NotificationRepo::list_for_user(&pool, user_id, false, 50, 0)
        .await
        .unwrap();
    let digest = notifications
        .iter()
        .find(|n| n.rule == "daily_digest")
        .expect("digest notification written");
    assert_eq!(digest.severity, "info");
    assert_eq!(digest.body, "1 unread notification since your last digest.");

    let settings = NotificationSettingsRepo::get(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(settings.digest_last_sent_at.is_some());

    // Re-running inside the suppression window sends nothing new.
    let sent = scheduler.process_digests(Utc::now()).await.unwrap();
    assert_eq!(sent, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn digest_skipped_when_nothing_unread(pool: PgPool) {
    let user_id = create_digest_user(&pool, &current_local_hour()).await;

    let scheduler = DigestScheduler::new(pool.clone(), TZ);
    let sent = scheduler.process_digests(Utc::now()).await.unwrap();
    assert_eq!(sent, 0);

    let settings = NotificationSettingsRepo::get(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert!(settings.digest_last_sent_at.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn digest_not_due_outside_configured_hour(pool: PgPool) {
    // Two hours from now is never the current hour.
    let other_hour = (Utc::now().with_timezone(&TZ) + Duration::hours(2))
        .format("%H:00")
        .to_string();
    let user_id = create_digest_user(&pool, &other_hour).await;
    insert_unread(&pool, user_id).await;

    let scheduler = DigestScheduler::new(pool.clone(), TZ);
    let sent = scheduler.process_digests(Utc::now()).await.unwrap();
    assert_eq!(sent, 0);

    // The seeded unread notification is still the only row.
    let notifications = NotificationRepo::list_for_user(&pool, user_id, false, 50, 0)
        .await
        .unwrap();
    assert_eq!(notifications.len(), 1);
}

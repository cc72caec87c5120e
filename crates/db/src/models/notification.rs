//! Notification entity models and DTOs.

use lumen_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// `read_at` is NULL while the notification is unread. `rule` and `severity`
/// hold the stable tags from `lumen_core::nudge::{RuleKind, Severity}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub rule: String,
    pub title: String,
    pub body: String,
    pub severity: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub action_url: Option<String>,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Insert payload for the notification writer.
#[derive(Debug, Clone)]
pub struct NewNotification<'a> {
    pub user_id: DbId,
    pub rule: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub severity: &'a str,
    pub entity_type: Option<&'a str>,
    pub entity_id: Option<DbId>,
    pub action_url: Option<&'a str>,
}

/// A row from the `notification_settings` table, one per user.
///
/// Quiet-hours bounds and digest time are `HH:MM` wall-clock strings;
/// `muted_entities` is a JSON array of
/// `lumen_core::nudge::EntityRef`-shaped objects.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationSettings {
    pub id: DbId,
    pub user_id: DbId,
    pub quiet_hours_start: Option<String>,
    pub quiet_hours_end: Option<String>,
    pub in_app_enabled: bool,
    pub email_enabled: bool,
    pub digest_enabled: bool,
    pub digest_time: Option<String>,
    pub digest_last_sent_at: Option<Timestamp>,
    pub nudges_enabled: bool,
    pub critical_only: bool,
    pub muted_entities: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for updating notification settings. All fields are optional; `None`
/// leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNotificationSettings {
    pub quiet_hours_start: Option<String>,
    pub quiet_hours_end: Option<String>,
    pub in_app_enabled: Option<bool>,
    pub email_enabled: Option<bool>,
    pub digest_enabled: Option<bool>,
    pub digest_time: Option<String>,
    pub nudges_enabled: Option<bool>,
    pub critical_only: Option<bool>,
    pub muted_entities: Option<serde_json::Value>,
}

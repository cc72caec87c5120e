//! Handlers for the `/notifications/settings` resource.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use lumen_core::error::CoreError;
use lumen_core::nudge::EntityRef;
use lumen_core::quiet_hours;
use lumen_db::models::notification::UpdateNotificationSettings;
use lumen_db::repositories::NotificationSettingsRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/notifications/settings
///
/// Return the authenticated user's notification settings, creating the
/// default row on first access.
async fn get_settings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let settings = NotificationSettingsRepo::get_or_create(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({ "data": settings })))
}

/// PUT /api/v1/notifications/settings
///
/// Partially update the authenticated user's settings. Time-of-day fields
/// must be `HH:MM`; `muted_entities` must be an array of entity references.
async fn update_settings(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateNotificationSettings>,
) -> AppResult<Json<serde_json::Value>> {
    validate(&input)?;

    // Make sure the row exists so a fresh user's first PUT doesn't 404.
    NotificationSettingsRepo::get_or_create(&state.pool, auth.user_id).await?;
    let updated = NotificationSettingsRepo::update(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "NotificationSettings",
            id: auth.user_id,
        }))?;

    Ok(Json(serde_json::json!({ "data": updated })))
}

/// Reject malformed wall-clock strings and mute lists before they reach the
/// database, where they would silently disable quiet hours or mutes.
fn validate(input: &UpdateNotificationSettings) -> Result<(), AppError> {
    for (field, value) in [
        ("quiet_hours_start", &input.quiet_hours_start),
        ("quiet_hours_end", &input.quiet_hours_end),
        ("digest_time", &input.digest_time),
    ] {
        if let Some(value) = value {
            if quiet_hours::parse_time(value).is_none() {
                return Err(AppError::BadRequest(format!(
                    "{field} must be a HH:MM time, got {value:?}"
                )));
            }
        }
    }

    if let Some(muted) = &input.muted_entities {
        if serde_json::from_value::<Vec<EntityRef>>(muted.clone()).is_err() {
            return Err(AppError::BadRequest(
                "muted_entities must be an array of {entity_type, entity_id} objects".to_string(),
            ));
        }
    }

    Ok(())
}

/// Mount `/notifications/settings` routes (under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/notifications/settings",
        get(get_settings).put(update_settings),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_times() {
        let input = UpdateNotificationSettings {
            quiet_hours_start: Some("21:00".to_string()),
            quiet_hours_end: Some("08:00".to_string()),
            digest_time: Some("07:30".to_string()),
            ..Default::default()
        };
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn rejects_malformed_time() {
        let input = UpdateNotificationSettings {
            quiet_hours_start: Some("9pm".to_string()),
            ..Default::default()
        };
        assert!(validate(&input).is_err());
    }

    #[test]
    fn rejects_malformed_mute_list() {
        let input = UpdateNotificationSettings {
            muted_entities: Some(serde_json::json!({ "entity_type": "project" })),
            ..Default::default()
        };
        assert!(validate(&input).is_err());
    }

    #[test]
    fn accepts_valid_mute_list() {
        let input = UpdateNotificationSettings {
            muted_entities: Some(serde_json::json!([
                { "entity_type": "project", "entity_id": 4 }
            ])),
            ..Default::default()
        };
        assert!(validate(&input).is_ok());
    }
}

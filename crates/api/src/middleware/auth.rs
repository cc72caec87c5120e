//! Authenticated-user extractor.
//!
//! Lumen Flow delegates authentication to the hosted provider: the fronting
//! gateway verifies the session and forwards the user's internal id in the
//! `X-User-Id` header. The API itself never sees credentials, so "auth"
//! here is reading that header and rejecting requests without it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lumen_core::error::CoreError;
use lumen_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Header set by the auth gateway on every verified request.
const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user extracted from the gateway-injected identity header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing X-User-Id header".into(),
                ))
            })?;

        let user_id: DbId = header.parse().map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid X-User-Id header".into(),
            ))
        })?;

        Ok(AuthUser { user_id })
    }
}

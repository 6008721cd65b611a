//! Role-gated extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects callers whose role does not
//! meet the requirement, so authorization is visible in the handler
//! signature.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use labstock_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires any authenticated, non-quarantined account.
///
/// PENDING-role callers are turned away here, before any business logic runs.
///
/// ```ignore
/// async fn list(RequireActive(user): RequireActive) -> AppResult<Json<...>> {
///     // user.role is never Role::Pending here
/// }
/// ```
pub struct RequireActive(pub AuthUser);

impl FromRequestParts<AppState> for RequireActive {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role.is_pending() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is pending approval".into(),
            )));
        }
        Ok(RequireActive(user))
    }
}

/// Requires the ADMIN or TA role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn create(RequireStaff(user): RequireStaff) -> AppResult<Json<...>> {
///     // user is guaranteed to be ADMIN or TA here
/// }
/// ```
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_staff() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin or TA role required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}

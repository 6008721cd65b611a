//! JWT-based authentication extractor for Axum handlers.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use labstock_core::error::CoreError;
use labstock_core::roles::Role;
use labstock_db::models::user::User;
use labstock_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller resolved from a JWT Bearer token in the
/// `Authorization` header.
///
/// The token only proves identity; the role is loaded from the users table on
/// every request so the gate never trusts a role the store did not supply.
/// Use this directly only for routes a quarantined (PENDING-role) account may
/// reach; everything else goes through the `rbac` wrappers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's user row.
    pub user: User,
    /// The caller's role, parsed from the row.
    pub role: Role,
}

impl AuthUser {
    pub fn user_id(&self) -> labstock_core::types::DbId {
        self.user.id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?;

        let role = Role::from_str(&user.role)
            .map_err(|e| AppError::Core(CoreError::Internal(e)))?;

        Ok(AuthUser { user, role })
    }
}

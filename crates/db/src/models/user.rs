//! User entity model and DTOs.

use labstock_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    /// `None` for Google-authenticated accounts.
    pub password_hash: Option<String>,
    pub name: String,
    /// Uppercase role string; parse with `labstock_core::roles::Role`.
    pub role: String,
    pub google_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a new user. Exactly one of `password_hash` and
/// `google_id` is set, depending on the sign-up path.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: Option<String>,
    pub name: String,
    pub role: String,
    pub google_id: Option<String>,
}

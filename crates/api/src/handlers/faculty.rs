//! Handler for the `/faculty` listing used when targeting a request.

use axum::extract::State;
use axum::Json;
use labstock_core::roles::Role;
use labstock_db::models::user::UserResponse;
use labstock_db::repositories::UserRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireActive;
use crate::state::AppState;

/// Response envelope for the faculty collection.
#[derive(Debug, Serialize)]
pub struct FacultyResponse {
    pub faculty: Vec<UserResponse>,
}

/// GET /faculty
///
/// All FACULTY-role users, for picking a request's target approver.
pub async fn list_faculty(
    State(state): State<AppState>,
    RequireActive(_user): RequireActive,
) -> AppResult<Json<FacultyResponse>> {
    let users = UserRepo::list_by_role(&state.pool, Role::Faculty.as_str()).await?;
    let faculty = users.iter().map(UserResponse::from).collect();
    Ok(Json(FacultyResponse { faculty }))
}

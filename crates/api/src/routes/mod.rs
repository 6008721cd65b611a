pub mod auth;
pub mod components;
pub mod health;
pub mod requests;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application route tree.
///
/// ```text
/// POST   /auth/register        register (public)
/// POST   /auth/login           login (public)
/// POST   /auth/google          Google sign-in (public)
/// GET    /auth/me              caller's own record
///
/// GET    /components           list components
/// POST   /components           create component (staff)
/// GET    /components/{id}      get component
/// PUT    /components/{id}      update component (staff)
/// DELETE /components/{id}      delete component (staff)
///
/// GET    /faculty              list faculty users
///
/// GET    /requests             role-scoped listing (?userId, ?status)
/// POST   /requests             create request
/// PUT    /requests/{id}        status transition
/// DELETE /requests/{id}        delete request (owner/staff, PENDING only)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/components", components::router())
        .route("/faculty", get(handlers::faculty::list_faculty))
        .nest("/requests", requests::router())
}

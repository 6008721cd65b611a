//! Route definitions for the `/components` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::components;
use crate::state::AppState;

/// Routes mounted at `/components`.
///
/// Mutations require the ADMIN or TA role (enforced by handler extractors).
///
/// ```text
/// GET    /       -> list_components
/// POST   /       -> create_component
/// GET    /{id}   -> get_component
/// PUT    /{id}   -> update_component
/// DELETE /{id}   -> delete_component
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(components::list_components).post(components::create_component),
        )
        .route(
            "/{id}",
            get(components::get_component)
                .put(components::update_component)
                .delete(components::delete_component),
        )
}

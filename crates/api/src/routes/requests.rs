//! Route definitions for the `/requests` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::requests;
use crate::state::AppState;

/// Routes mounted at `/requests`.
///
/// ```text
/// GET    /       -> list_requests (?userId, ?status)
/// POST   /       -> create_request
/// PUT    /{id}   -> update_request_status
/// DELETE /{id}   -> delete_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(requests::list_requests).post(requests::create_request),
        )
        .route(
            "/{id}",
            axum::routing::put(requests::update_request_status).delete(requests::delete_request),
        )
}

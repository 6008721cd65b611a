//! Handlers for the `/requests` resource: creation, role-scoped listing,
//! status transitions, and deletion.
//!
//! Transition legality and gating come from the `labstock_core::lifecycle`
//! table; this module wires the table to the store. The order of checks is
//! fixed: input shape, then existence (404), then authorization (403), then
//! status rules (400) -- with the one exception of stock sufficiency, which
//! can only be checked inside the fulfillment transaction.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labstock_core::error::CoreError;
use labstock_core::lifecycle::{
    can_delete, gate_allows, transition_rule, RequestStatus, TransitionGate,
};
use labstock_core::roles::Role;
use labstock_core::types::DbId;
use labstock_db::models::request::{CreateRequest, NewRequestItem, Request, RequestWithItems};
use labstock_db::repositories::{
    ComponentRepo, FulfillOutcome, RequestRepo, RequestScope, UserRepo,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireActive;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One line of `POST /requests`. Fields are optional so missing values
/// surface as 400s with a message rather than deserialization errors.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestItemInput {
    pub component_id: Option<DbId>,
    pub quantity: Option<i32>,
}

/// Request body for `POST /requests`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub project_title: Option<String>,
    pub target_faculty_id: Option<DbId>,
    pub items: Option<Vec<RequestItemInput>>,
}

/// Query parameters for `GET /requests`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequestsQuery {
    /// Only honored for staff; other roles are always scoped to themselves.
    pub user_id: Option<DbId>,
    pub status: Option<String>,
}

/// Request body for `PUT /requests/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Response envelope for a single request.
#[derive(Debug, Serialize)]
pub struct RequestResponse {
    pub request: RequestWithItems,
}

/// Response envelope for the request collection.
#[derive(Debug, Serialize)]
pub struct RequestsResponse {
    pub requests: Vec<RequestWithItems>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /requests
///
/// Create a request in PENDING with its items. Touches no stock.
pub async fn create_request(
    State(state): State<AppState>,
    RequireActive(auth): RequireActive,
    Json(input): Json<CreateRequestBody>,
) -> AppResult<(StatusCode, Json<RequestResponse>)> {
    // 1. Input shape.
    let project_title = input
        .project_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("projectTitle is required".into())))?;
    let target_faculty_id = input.target_faculty_id.ok_or_else(|| {
        AppError::Core(CoreError::Validation("targetFacultyId is required".into()))
    })?;

    let raw_items = input.items.unwrap_or_default();
    let mut items: Vec<(DbId, i32)> = Vec::with_capacity(raw_items.len());
    for item in &raw_items {
        let component_id = item.component_id.ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Every item needs a componentId".into(),
            ))
        })?;
        let quantity = item.quantity.ok_or_else(|| {
            AppError::Core(CoreError::Validation("Every item needs a quantity".into()))
        })?;
        items.push((component_id, quantity));
    }

    labstock_core::lifecycle::validate_new_request(project_title, &items)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // 2. The target must be a real faculty member.
    let target = UserRepo::find_by_id(&state.pool, target_faculty_id).await?;
    let target_is_faculty = target
        .map(|u| matches!(Role::from_str(&u.role), Ok(Role::Faculty)))
        .unwrap_or(false);
    if !target_is_faculty {
        return Err(AppError::Core(CoreError::Validation(
            "targetFacultyId must reference a faculty member".into(),
        )));
    }

    // 3. Every referenced component must exist.
    let component_ids: Vec<DbId> = items.iter().map(|&(id, _)| id).collect();
    let missing = ComponentRepo::find_missing(&state.pool, &component_ids).await?;
    if let Some(id) = missing.first() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown component {id}"
        ))));
    }

    // 4. Insert request + items in one transaction.
    let request = RequestRepo::create(
        &state.pool,
        &CreateRequest {
            user_id: auth.user_id(),
            target_faculty_id,
            project_title: project_title.to_string(),
            items: items
                .iter()
                .map(|&(component_id, quantity)| NewRequestItem {
                    component_id,
                    quantity,
                })
                .collect(),
        },
    )
    .await?;

    tracing::info!(request_id = request.id, user_id = auth.user_id(), "Created request");
    let request = with_items(&state, request).await?;
    Ok((StatusCode::CREATED, Json(RequestResponse { request })))
}

/// GET /requests?userId=&status=
///
/// Role-scoped listing: students (and other default roles) see their own
/// requests regardless of any `userId` filter, faculty see requests
/// targeting them, staff see everything and may filter.
pub async fn list_requests(
    State(state): State<AppState>,
    RequireActive(auth): RequireActive,
    Query(query): Query<ListRequestsQuery>,
) -> AppResult<Json<RequestsResponse>> {
    let status = query
        .status
        .as_deref()
        .map(RequestStatus::from_str)
        .transpose()
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let scope = if auth.role.is_staff() {
        RequestScope::All {
            user_id: query.user_id,
        }
    } else if auth.role == Role::Faculty {
        RequestScope::TargetedTo(auth.user_id())
    } else {
        RequestScope::OwnedBy(auth.user_id())
    };

    let requests = RequestRepo::list(&state.pool, scope, status.map(|s| s.as_str())).await?;

    // Attach items in one round trip.
    let ids: Vec<DbId> = requests.iter().map(|r| r.id).collect();
    let mut items_by_request: HashMap<DbId, Vec<_>> = HashMap::new();
    for item in RequestRepo::items_for_requests(&state.pool, &ids).await? {
        items_by_request.entry(item.request_id).or_default().push(item);
    }

    let requests = requests
        .into_iter()
        .map(|request| {
            let items = items_by_request.remove(&request.id).unwrap_or_default();
            RequestWithItems { request, items }
        })
        .collect();

    Ok(Json(RequestsResponse { requests }))
}

/// PUT /requests/{id}
///
/// Drive a request through its lifecycle. Approval/rejection flips status
/// only; fulfillment additionally runs the all-or-nothing stock deduction.
pub async fn update_request_status(
    State(state): State<AppState>,
    RequireActive(auth): RequireActive,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<RequestResponse>> {
    // 1. The requested target status must be one we know.
    let target = input
        .status
        .as_deref()
        .ok_or_else(|| AppError::Core(CoreError::Validation("status is required".into())))?
        .parse::<RequestStatus>()
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // 2. Existence precedes authorization and status logic.
    let request = RequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }))?;
    let current = request
        .status
        .parse::<RequestStatus>()
        .map_err(|e| AppError::Core(CoreError::Internal(e)))?;

    // 3. Table lookup decides legality; the gate decides who.
    let rule = transition_rule(current, target).map_err(AppError::Core)?;
    if !gate_allows(rule.gate, auth.role, auth.user_id(), request.target_faculty_id) {
        let message = match rule.gate {
            TransitionGate::TargetedFacultyOrStaff => {
                "Only the targeted faculty member or staff may decide this request"
            }
            TransitionGate::StaffOnly => "Only staff may fulfill requests",
        };
        return Err(AppError::Core(CoreError::Forbidden(message.into())));
    }

    // 4. Apply.
    let updated = if rule.deducts_stock {
        match RequestRepo::fulfill(&state.pool, id).await? {
            FulfillOutcome::Fulfilled(request) => request,
            FulfillOutcome::InsufficientStock { component_name, .. } => {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Insufficient quantity available for '{component_name}'"
                ))));
            }
            // A concurrent caller moved the request first.
            FulfillOutcome::NotApproved => {
                return Err(AppError::Core(CoreError::Validation(
                    "Request is no longer approved".into(),
                )));
            }
        }
    } else {
        RequestRepo::set_status(&state.pool, id, target.as_str())
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Request",
                id,
            }))?
    };

    tracing::info!(request_id = id, status = %target, "Request transitioned");
    let request = with_items(&state, updated).await?;
    Ok(Json(RequestResponse { request }))
}

/// DELETE /requests/{id}
///
/// Owners and staff may delete a request, but only while it is PENDING.
pub async fn delete_request(
    State(state): State<AppState>,
    RequireActive(auth): RequireActive,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let request = RequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id,
        }))?;

    if !can_delete(auth.role, auth.user_id(), request.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only delete your own requests".into(),
        )));
    }

    let current = request
        .status
        .parse::<RequestStatus>()
        .map_err(|e| AppError::Core(CoreError::Internal(e)))?;
    if current != RequestStatus::Pending {
        return Err(AppError::Core(CoreError::Validation(
            "Only pending requests can be deleted".into(),
        )));
    }

    RequestRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a request's items and build the response shape.
async fn with_items(state: &AppState, request: Request) -> Result<RequestWithItems, AppError> {
    let items = RequestRepo::items(&state.pool, request.id).await?;
    Ok(RequestWithItems { request, items })
}

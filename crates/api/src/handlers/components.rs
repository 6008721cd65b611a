//! Handlers for the `/components` resource.
//!
//! Reads are open to any active account; mutations require staff (ADMIN/TA).

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labstock_core::catalog::{initial_quantities, Category, Location};
use labstock_core::error::CoreError;
use labstock_core::types::DbId;
use labstock_db::models::component::{Component, CreateComponent, UpdateComponent};
use labstock_db::repositories::{ComponentDelete, ComponentRepo, ComponentUpdate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireActive, RequireStaff};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /components`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComponentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_quantity: Option<i32>,
    pub available_quantity: Option<i32>,
    pub category: Option<String>,
    pub location: Option<String>,
}

/// Request body for `PUT /components/{id}`. All fields optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComponentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_quantity: Option<i32>,
    pub available_quantity: Option<i32>,
    pub category: Option<String>,
    pub location: Option<String>,
}

/// Response envelope for the component collection.
#[derive(Debug, Serialize)]
pub struct ComponentsResponse {
    pub components: Vec<Component>,
}

/// Response envelope for a single component.
#[derive(Debug, Serialize)]
pub struct ComponentResponse {
    pub component: Component,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /components
pub async fn list_components(
    State(state): State<AppState>,
    RequireActive(_user): RequireActive,
) -> AppResult<Json<ComponentsResponse>> {
    let components = ComponentRepo::list(&state.pool).await?;
    Ok(Json(ComponentsResponse { components }))
}

/// GET /components/{id}
pub async fn get_component(
    State(state): State<AppState>,
    RequireActive(_user): RequireActive,
    Path(id): Path<DbId>,
) -> AppResult<Json<ComponentResponse>> {
    let component = ComponentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Component",
            id,
        }))?;
    Ok(Json(ComponentResponse { component }))
}

/// POST /components
///
/// Create a component. `availableQuantity` defaults to `totalQuantity` when
/// unspecified; an explicit value may start the component partially
/// available.
pub async fn create_component(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Json(input): Json<CreateComponentRequest>,
) -> AppResult<(StatusCode, Json<ComponentResponse>)> {
    let name = input
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("name is required".into())))?;

    let category = validate_category(input.category.as_deref())?;
    let location = validate_location(input.location.as_deref())?;

    let (total, available) =
        initial_quantities(input.total_quantity.unwrap_or(0), input.available_quantity)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let component = ComponentRepo::create(
        &state.pool,
        &CreateComponent {
            name: name.to_string(),
            description: input.description,
            image_url: input.image_url,
            total_quantity: total,
            available_quantity: available,
            category,
            location,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ComponentResponse { component })))
}

/// PUT /components/{id}
///
/// Update a component. Quantity rules (re-basing, `available <= total`) are
/// resolved inside the repository's update transaction.
pub async fn update_component(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComponentRequest>,
) -> AppResult<Json<ComponentResponse>> {
    if let Some(name) = input.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "name must not be empty".into(),
            )));
        }
    }
    let category = validate_category(input.category.as_deref())?;
    let location = validate_location(input.location.as_deref())?;

    let outcome = ComponentRepo::update(
        &state.pool,
        id,
        &UpdateComponent {
            name: input.name,
            description: input.description,
            image_url: input.image_url,
            total_quantity: input.total_quantity,
            available_quantity: input.available_quantity,
            category,
            location,
        },
    )
    .await?;

    match outcome {
        ComponentUpdate::Updated(component) => Ok(Json(ComponentResponse { component })),
        ComponentUpdate::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Component",
            id,
        })),
        ComponentUpdate::InvalidQuantities(msg) => {
            Err(AppError::Core(CoreError::Validation(msg)))
        }
    }
}

/// DELETE /components/{id}
///
/// Delete a component. Blocked while any request item references it.
pub async fn delete_component(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    match ComponentRepo::delete(&state.pool, id).await? {
        ComponentDelete::Deleted => Ok(StatusCode::NO_CONTENT),
        ComponentDelete::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Component",
            id,
        })),
        ComponentDelete::Referenced => Err(AppError::Core(CoreError::Conflict(
            "Component is referenced by existing requests".into(),
        ))),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse and normalize an optional category, rejecting unknown values.
fn validate_category(raw: Option<&str>) -> Result<Option<String>, AppError> {
    raw.map(|s| {
        Category::from_str(s)
            .map(|c| c.as_str().to_string())
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))
    })
    .transpose()
}

/// Parse and normalize an optional location, rejecting unknown values.
fn validate_location(raw: Option<&str>) -> Result<Option<String>, AppError> {
    raw.map(|s| {
        Location::from_str(s)
            .map(|l| l.as_str().to_string())
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))
    })
    .transpose()
}

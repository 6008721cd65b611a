//! Component entity model and DTOs.

use labstock_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full component row from the `components` table. Safe to serialize as-is.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_quantity: i32,
    pub available_quantity: i32,
    /// Uppercase category string; parse with `labstock_core::catalog::Category`.
    pub category: Option<String>,
    /// Uppercase location string; parse with `labstock_core::catalog::Location`.
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new component. Quantities are already resolved and
/// validated (`labstock_core::catalog::initial_quantities`).
#[derive(Debug)]
pub struct CreateComponent {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_quantity: i32,
    pub available_quantity: i32,
    pub category: Option<String>,
    pub location: Option<String>,
}

/// DTO for updating a component. `None` fields keep their current value;
/// quantity fields are resolved against the current row inside the update
/// transaction (`labstock_core::catalog::resolve_quantity_update`).
#[derive(Debug, Default)]
pub struct UpdateComponent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub total_quantity: Option<i32>,
    pub available_quantity: Option<i32>,
    pub category: Option<String>,
    pub location: Option<String>,
}

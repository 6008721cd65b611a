//! Request and request-item entity models and DTOs.

use labstock_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full request row from the `requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: DbId,
    pub user_id: DbId,
    pub target_faculty_id: DbId,
    pub project_title: String,
    /// Uppercase status string; parse with `labstock_core::lifecycle::RequestStatus`.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Line item joined with its component's name for display.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestItemDetail {
    pub id: DbId,
    pub request_id: DbId,
    pub component_id: DbId,
    pub component_name: String,
    pub quantity: i32,
}

/// A request together with its line items, as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWithItems {
    #[serde(flatten)]
    pub request: Request,
    pub items: Vec<RequestItemDetail>,
}

/// One line of a new request. Quantities are pre-validated
/// (`labstock_core::lifecycle::validate_new_request`).
#[derive(Debug, Clone, Copy)]
pub struct NewRequestItem {
    pub component_id: DbId,
    pub quantity: i32,
}

/// DTO for inserting a new request with its items.
#[derive(Debug)]
pub struct CreateRequest {
    pub user_id: DbId,
    pub target_faculty_id: DbId,
    pub project_title: String,
    pub items: Vec<NewRequestItem>,
}

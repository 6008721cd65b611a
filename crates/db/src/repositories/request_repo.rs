//! Repository for the `requests` and `request_items` tables.
//!
//! Fulfillment is the only path that mutates `available_quantity` outside an
//! authorized component edit. It runs as one transaction: flip the request
//! row out of APPROVED first (locking it against a concurrent fulfillment of
//! the same request), then apply one conditional decrement per item. Any
//! decrement that matches zero rows aborts the whole transaction.

use labstock_core::types::DbId;
use sqlx::PgPool;

use crate::models::request::{CreateRequest, Request, RequestItemDetail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, target_faculty_id, project_title, status, created_at, updated_at";

/// Item columns joined with the component name.
const ITEM_COLUMNS: &str = "ri.id, ri.request_id, ri.component_id, \
                            c.name AS component_name, ri.quantity";

/// Role-scoped visibility for request listing.
#[derive(Debug, Clone, Copy)]
pub enum RequestScope {
    /// Requests created by this user (students and other default roles).
    OwnedBy(DbId),
    /// Requests targeting this faculty member.
    TargetedTo(DbId),
    /// Every request, optionally filtered by requesting user (staff).
    All { user_id: Option<DbId> },
}

/// Outcome of a fulfillment attempt.
#[derive(Debug)]
pub enum FulfillOutcome {
    Fulfilled(Request),
    /// Some item wanted more than the component had available. Nothing was
    /// decremented.
    InsufficientStock {
        component_id: DbId,
        component_name: String,
    },
    /// The request was no longer APPROVED when the transaction started.
    NotApproved,
}

/// Provides operations for requests and their line items.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a request and all of its items in one transaction.
    ///
    /// Input shape and referenced ids are validated by the caller before this
    /// runs; the transaction only guarantees the request and its items land
    /// together.
    pub async fn create(pool: &PgPool, input: &CreateRequest) -> Result<Request, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert = format!(
            "INSERT INTO requests (user_id, target_faculty_id, project_title)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, Request>(&insert)
            .bind(input.user_id)
            .bind(input.target_faculty_id)
            .bind(&input.project_title)
            .fetch_one(&mut *tx)
            .await?;

        for item in &input.items {
            sqlx::query(
                "INSERT INTO request_items (request_id, component_id, quantity)
                 VALUES ($1, $2, $3)",
            )
            .bind(request.id)
            .bind(item.component_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(request)
    }

    /// Find a request by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Request>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE id = $1");
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests visible under `scope`, newest first, optionally filtered
    /// by status.
    pub async fn list(
        pool: &PgPool,
        scope: RequestScope,
        status: Option<&str>,
    ) -> Result<Vec<Request>, sqlx::Error> {
        let (owner, faculty, user_filter) = match scope {
            RequestScope::OwnedBy(id) => (Some(id), None, None),
            RequestScope::TargetedTo(id) => (None, Some(id), None),
            RequestScope::All { user_id } => (None, None, user_id),
        };

        let query = format!(
            "SELECT {COLUMNS} FROM requests
             WHERE ($1::BIGINT IS NULL OR user_id = $1)
               AND ($2::BIGINT IS NULL OR target_faculty_id = $2)
               AND ($3::BIGINT IS NULL OR user_id = $3)
               AND ($4::TEXT IS NULL OR status = $4)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(owner)
            .bind(faculty)
            .bind(user_filter)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Items for one request, joined with component names, in insertion order.
    pub async fn items(pool: &PgPool, request_id: DbId) -> Result<Vec<RequestItemDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM request_items ri
             JOIN components c ON c.id = ri.component_id
             WHERE ri.request_id = $1
             ORDER BY ri.id ASC"
        );
        sqlx::query_as::<_, RequestItemDetail>(&query)
            .bind(request_id)
            .fetch_all(pool)
            .await
    }

    /// Items for a set of requests in one round trip (listing avoids N+1).
    pub async fn items_for_requests(
        pool: &PgPool,
        request_ids: &[DbId],
    ) -> Result<Vec<RequestItemDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM request_items ri
             JOIN components c ON c.id = ri.component_id
             WHERE ri.request_id = ANY($1)
             ORDER BY ri.request_id ASC, ri.id ASC"
        );
        sqlx::query_as::<_, RequestItemDetail>(&query)
            .bind(request_ids)
            .fetch_all(pool)
            .await
    }

    /// Set a request's status without inventory side effects (approval and
    /// rejection). Returns the updated row, or `None` if not found.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Request>, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Fulfill an APPROVED request: atomically deduct every item's quantity
    /// from its component's available stock and mark the request FULFILLED.
    ///
    /// All-or-nothing. Each deduction is a single conditional UPDATE whose
    /// predicate re-checks availability, so two concurrent fulfillments
    /// contending for the same stock cannot both succeed; the loser's
    /// transaction rolls back with every quantity unchanged.
    pub async fn fulfill(pool: &PgPool, id: DbId) -> Result<FulfillOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Flip the status first: the row lock serializes concurrent
        // fulfillments of the same request, and the predicate turns the loser
        // away before it touches stock.
        let flip = format!(
            "UPDATE requests SET status = 'FULFILLED', updated_at = NOW()
             WHERE id = $1 AND status = 'APPROVED'
             RETURNING {COLUMNS}"
        );
        let Some(request) = sqlx::query_as::<_, Request>(&flip)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(FulfillOutcome::NotApproved);
        };

        // Decrement in component-id order so two multi-item requests always
        // take their component row locks in the same order.
        let items = sqlx::query_as::<_, RequestItemDetail>(&format!(
            "SELECT {ITEM_COLUMNS} FROM request_items ri
             JOIN components c ON c.id = ri.component_id
             WHERE ri.request_id = $1
             ORDER BY ri.component_id ASC"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for item in &items {
            let decremented = sqlx::query(
                "UPDATE components
                 SET available_quantity = available_quantity - $2, updated_at = NOW()
                 WHERE id = $1 AND available_quantity >= $2",
            )
            .bind(item.component_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                tx.rollback().await?;
                tracing::debug!(
                    request_id = id,
                    component_id = item.component_id,
                    wanted = item.quantity,
                    "fulfillment aborted: insufficient stock"
                );
                return Ok(FulfillOutcome::InsufficientStock {
                    component_id: item.component_id,
                    component_name: item.component_name.clone(),
                });
            }
        }

        tx.commit().await?;
        Ok(FulfillOutcome::Fulfilled(request))
    }

    /// Delete a request. Items go with it via `ON DELETE CASCADE`.
    ///
    /// The caller enforces the PENDING-only rule; this returns `true` if a
    /// row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

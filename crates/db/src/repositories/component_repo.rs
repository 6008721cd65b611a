//! Repository for the `components` table.
//!
//! The quantity invariant `0 <= available_quantity <= total_quantity` is
//! protected three ways: resolved values from `labstock_core::catalog` on the
//! create/update paths, row CHECK constraints, and the conditional decrement
//! predicate on the fulfillment path (see `request_repo`).

use labstock_core::catalog::resolve_quantity_update;
use labstock_core::types::DbId;
use sqlx::PgPool;

use crate::models::component::{Component, CreateComponent, UpdateComponent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, image_url, total_quantity, \
                       available_quantity, category, location, created_at, updated_at";

/// Outcome of a component update.
#[derive(Debug)]
pub enum ComponentUpdate {
    Updated(Component),
    NotFound,
    /// The requested quantities violate `available <= total` (or are negative).
    InvalidQuantities(String),
}

/// Outcome of a component delete.
#[derive(Debug, PartialEq, Eq)]
pub enum ComponentDelete {
    Deleted,
    NotFound,
    /// At least one request item still references the component.
    Referenced,
}

/// Provides CRUD operations for components.
pub struct ComponentRepo;

impl ComponentRepo {
    /// Insert a new component, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComponent) -> Result<Component, sqlx::Error> {
        let query = format!(
            "INSERT INTO components
                (name, description, image_url, total_quantity, available_quantity,
                 category, location)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Component>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(input.total_quantity)
            .bind(input.available_quantity)
            .bind(&input.category)
            .bind(&input.location)
            .fetch_one(pool)
            .await
    }

    /// Find a component by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Component>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM components WHERE id = $1");
        sqlx::query_as::<_, Component>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all components ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Component>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM components ORDER BY name ASC");
        sqlx::query_as::<_, Component>(&query).fetch_all(pool).await
    }

    /// Update a component. Only non-`None` fields in `input` are applied.
    ///
    /// Quantity fields are resolved against the current row under a row lock
    /// so a concurrent fulfillment cannot interleave between read and write:
    /// changing `total_quantity` alone re-bases `available_quantity` to the
    /// new total, and an explicit `available_quantity` must not exceed the
    /// effective total.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateComponent,
    ) -> Result<ComponentUpdate, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM components WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, Component>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ComponentUpdate::NotFound);
        };

        let (total, available) = match resolve_quantity_update(
            current.total_quantity,
            current.available_quantity,
            input.total_quantity,
            input.available_quantity,
        ) {
            Ok(resolved) => resolved,
            Err(msg) => return Ok(ComponentUpdate::InvalidQuantities(msg)),
        };

        let update = format!(
            "UPDATE components SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                total_quantity = $5,
                available_quantity = $6,
                category = COALESCE($7, category),
                location = COALESCE($8, location),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let component = sqlx::query_as::<_, Component>(&update)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(total)
            .bind(available)
            .bind(&input.category)
            .bind(&input.location)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ComponentUpdate::Updated(component))
    }

    /// Delete a component by ID.
    ///
    /// The `ON DELETE RESTRICT` foreign key from `request_items` is the
    /// referential guard; a restrict violation surfaces as
    /// [`ComponentDelete::Referenced`] instead of an error.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<ComponentDelete, sqlx::Error> {
        let result = sqlx::query("DELETE FROM components WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(ComponentDelete::Deleted),
            Ok(_) => Ok(ComponentDelete::NotFound),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23503") => {
                Ok(ComponentDelete::Referenced)
            }
            Err(other) => Err(other),
        }
    }

    /// Which of the given component ids do not exist. Used to validate a new
    /// request's items before its insert transaction begins.
    pub async fn find_missing(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        let existing: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM components WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(pool)
                .await?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !existing.iter().any(|(e,)| e == id))
            .collect())
    }
}

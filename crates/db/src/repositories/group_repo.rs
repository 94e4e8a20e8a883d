//! Repository for the `groups` table.
//!
//! Every query is scoped by `owner_id`; a group owned by someone else is
//! indistinguishable from a missing one.

use noda_core::query::CollectionQuery;
use noda_core::text::like_pattern;
use noda_core::types::DbId;
use sqlx::PgPool;

use crate::models::group::{CreateGroup, Group, UpdateGroup};
use crate::{deadline, DbError};

const COLUMNS: &str = "id, owner_id, name, description, created_at, updated_at";

pub const SORTABLE: &[&str] = &["name", "description", "created_at", "updated_at"];

const DEFAULT_ORDER: &str = "created_at ASC, id ASC";

pub struct GroupRepo;

impl GroupRepo {
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateGroup,
    ) -> Result<Group, DbError> {
        let query = format!(
            "INSERT INTO groups (owner_id, name, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, Group>(&query)
                .bind(owner_id)
                .bind(&input.name)
                .bind(&input.description)
                .fetch_one(pool),
        )
        .await
    }

    pub async fn find(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<Option<Group>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = $1 AND owner_id = $2");
        deadline(
            sqlx::query_as::<_, Group>(&query)
                .bind(id)
                .bind(owner_id)
                .fetch_optional(pool),
        )
        .await
    }

    pub async fn exists(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, DbError> {
        deadline(
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM groups WHERE id = $1 AND owner_id = $2)",
            )
            .bind(id)
            .bind(owner_id)
            .fetch_one(pool),
        )
        .await
    }

    /// Page through an owner's groups. `search` matches the name.
    pub async fn list(
        pool: &PgPool,
        owner_id: DbId,
        params: &CollectionQuery,
    ) -> Result<Vec<Group>, DbError> {
        let order = params.order_by(SORTABLE, DEFAULT_ORDER);
        let query = format!(
            "SELECT {COLUMNS} FROM groups \
             WHERE owner_id = $1 AND ($2::text IS NULL OR name ILIKE $2) \
             ORDER BY {order} \
             LIMIT $3 OFFSET $4"
        );
        let pattern = params.search.as_deref().map(like_pattern);
        deadline(
            sqlx::query_as::<_, Group>(&query)
                .bind(owner_id)
                .bind(pattern)
                .bind(params.pagination.limit())
                .bind(params.pagination.offset())
                .fetch_all(pool),
        )
        .await
    }

    /// Returns `None` if no such group exists under the owner.
    pub async fn update(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        input: &UpdateGroup,
    ) -> Result<Option<Group>, DbError> {
        let query = format!(
            "UPDATE groups SET \
                 name = COALESCE($3, name), \
                 description = COALESCE($4, description) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, Group>(&query)
                .bind(id)
                .bind(owner_id)
                .bind(&input.name)
                .bind(&input.description)
                .fetch_optional(pool),
        )
        .await
    }

    /// Delete a group. Its lists and their tasks cascade.
    ///
    /// Returns `true` if a group was deleted.
    pub async fn delete(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query("DELETE FROM groups WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

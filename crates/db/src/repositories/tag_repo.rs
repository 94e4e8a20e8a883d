//! Repository for the `tags` and `task_tags` tables.

use noda_core::query::CollectionQuery;
use noda_core::text::like_pattern;
use noda_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{CreateTag, Tag, UpdateTag};
use crate::{deadline, DbError};

const COLUMNS: &str = "id, owner_id, name, color, created_at, updated_at";

pub const SORTABLE: &[&str] = &["name", "color", "created_at", "updated_at"];

const DEFAULT_ORDER: &str = "name ASC, id ASC";

pub struct TagRepo;

impl TagRepo {
    // -----------------------------------------------------------------------
    // Tag CRUD
    // -----------------------------------------------------------------------

    /// Create a tag. A name already used by the owner violates
    /// `uq_tags_owner_name`.
    pub async fn create(pool: &PgPool, owner_id: DbId, input: &CreateTag) -> Result<Tag, DbError> {
        let query = format!(
            "INSERT INTO tags (owner_id, name, color) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, Tag>(&query)
                .bind(owner_id)
                .bind(&input.name)
                .bind(&input.color)
                .fetch_one(pool),
        )
        .await
    }

    pub async fn find(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<Option<Tag>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1 AND owner_id = $2");
        deadline(
            sqlx::query_as::<_, Tag>(&query)
                .bind(id)
                .bind(owner_id)
                .fetch_optional(pool),
        )
        .await
    }

    pub async fn list(
        pool: &PgPool,
        owner_id: DbId,
        params: &CollectionQuery,
    ) -> Result<Vec<Tag>, DbError> {
        let order = params.order_by(SORTABLE, DEFAULT_ORDER);
        let query = format!(
            "SELECT {COLUMNS} FROM tags \
             WHERE owner_id = $1 AND ($2::text IS NULL OR name ILIKE $2) \
             ORDER BY {order} \
             LIMIT $3 OFFSET $4"
        );
        let pattern = params.search.as_deref().map(like_pattern);
        deadline(
            sqlx::query_as::<_, Tag>(&query)
                .bind(owner_id)
                .bind(pattern)
                .bind(params.pagination.limit())
                .bind(params.pagination.offset())
                .fetch_all(pool),
        )
        .await
    }

    pub async fn update(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        input: &UpdateTag,
    ) -> Result<Option<Tag>, DbError> {
        let query = format!(
            "UPDATE tags SET \
                 name = COALESCE($3, name), \
                 color = COALESCE($4, color) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, Tag>(&query)
                .bind(id)
                .bind(owner_id)
                .bind(&input.name)
                .bind(&input.color)
                .fetch_optional(pool),
        )
        .await
    }

    /// Delete a tag. Its task links cascade.
    pub async fn delete(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query("DELETE FROM tags WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Task links
    // -----------------------------------------------------------------------

    pub async fn list_for_task(pool: &PgPool, task_id: DbId) -> Result<Vec<Tag>, DbError> {
        let query = format!(
            "SELECT {} FROM tags t \
             JOIN task_tags tt ON tt.tag_id = t.id \
             WHERE tt.task_id = $1 \
             ORDER BY t.name, t.id",
            qualified("t")
        );
        deadline(
            sqlx::query_as::<_, Tag>(&query)
                .bind(task_id)
                .fetch_all(pool),
        )
        .await
    }

    /// Link a tag to a task. Idempotent.
    pub async fn link(pool: &PgPool, task_id: DbId, tag_id: DbId) -> Result<(), DbError> {
        deadline(
            sqlx::query(
                "INSERT INTO task_tags (task_id, tag_id) VALUES ($1, $2) \
                 ON CONFLICT (task_id, tag_id) DO NOTHING",
            )
            .bind(task_id)
            .bind(tag_id)
            .execute(pool),
        )
        .await?;
        Ok(())
    }

    /// Unlink a tag from a task. Idempotent; returns whether a link existed.
    pub async fn unlink(pool: &PgPool, task_id: DbId, tag_id: DbId) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query("DELETE FROM task_tags WHERE task_id = $1 AND tag_id = $2")
                .bind(task_id)
                .bind(tag_id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// [`COLUMNS`] prefixed with a table alias.
fn qualified(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

//! Repository for the `attachments` table.

use noda_core::query::CollectionQuery;
use noda_core::text::like_pattern;
use noda_core::types::DbId;
use sqlx::PgPool;

use crate::models::attachment::{Attachment, CreateAttachment};
use crate::{deadline, DbError};

const COLUMNS: &str = "id, task_id, file_name, file_url, created_at";

pub const SORTABLE: &[&str] = &["file_name", "created_at"];

const DEFAULT_ORDER: &str = "created_at ASC, id ASC";

pub struct AttachmentRepo;

impl AttachmentRepo {
    pub async fn list(
        pool: &PgPool,
        task_id: DbId,
        params: &CollectionQuery,
    ) -> Result<Vec<Attachment>, DbError> {
        let order = params.order_by(SORTABLE, DEFAULT_ORDER);
        let query = format!(
            "SELECT {COLUMNS} FROM attachments \
             WHERE task_id = $1 AND ($2::text IS NULL OR file_name ILIKE $2) \
             ORDER BY {order} \
             LIMIT $3 OFFSET $4"
        );
        let pattern = params.search.as_deref().map(like_pattern);
        deadline(
            sqlx::query_as::<_, Attachment>(&query)
                .bind(task_id)
                .bind(pattern)
                .bind(params.pagination.limit())
                .bind(params.pagination.offset())
                .fetch_all(pool),
        )
        .await
    }

    pub async fn create(
        pool: &PgPool,
        task_id: DbId,
        input: &CreateAttachment,
    ) -> Result<Attachment, DbError> {
        let query = format!(
            "INSERT INTO attachments (task_id, file_name, file_url) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, Attachment>(&query)
                .bind(task_id)
                .bind(&input.file_name)
                .bind(&input.file_url)
                .fetch_one(pool),
        )
        .await
    }

    pub async fn find(
        pool: &PgPool,
        task_id: DbId,
        id: DbId,
    ) -> Result<Option<Attachment>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM attachments WHERE id = $1 AND task_id = $2");
        deadline(
            sqlx::query_as::<_, Attachment>(&query)
                .bind(id)
                .bind(task_id)
                .fetch_optional(pool),
        )
        .await
    }

    pub async fn delete(pool: &PgPool, task_id: DbId, id: DbId) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query("DELETE FROM attachments WHERE id = $1 AND task_id = $2")
                .bind(id)
                .bind(task_id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! Repository for the `steps` table.
//!
//! Steps are addressed through their task; callers resolve the task under
//! its owner first. Positions are 1-based and dense within a task.

use noda_core::query::CollectionQuery;
use noda_core::text::like_pattern;
use noda_core::types::DbId;
use sqlx::PgPool;

use crate::models::step::{Step, UpdateStep};
use crate::{deadline, DbError};

const COLUMNS: &str = "id, task_id, position, description, completed_at, created_at, updated_at";

pub const SORTABLE: &[&str] = &["position", "description", "created_at", "updated_at"];

const DEFAULT_ORDER: &str = "position ASC, id ASC";

pub struct StepRepo;

impl StepRepo {
    pub async fn list(
        pool: &PgPool,
        task_id: DbId,
        params: &CollectionQuery,
    ) -> Result<Vec<Step>, DbError> {
        let order = params.order_by(SORTABLE, DEFAULT_ORDER);
        let query = format!(
            "SELECT {COLUMNS} FROM steps \
             WHERE task_id = $1 AND ($2::text IS NULL OR description ILIKE $2) \
             ORDER BY {order} \
             LIMIT $3 OFFSET $4"
        );
        let pattern = params.search.as_deref().map(like_pattern);
        deadline(
            sqlx::query_as::<_, Step>(&query)
                .bind(task_id)
                .bind(pattern)
                .bind(params.pagination.limit())
                .bind(params.pagination.offset())
                .fetch_all(pool),
        )
        .await
    }

    /// Append a step after the task's last one.
    ///
    /// Returns `None` if the task vanished in the meantime.
    pub async fn create(
        pool: &PgPool,
        task_id: DbId,
        description: &str,
    ) -> Result<Option<Step>, DbError> {
        deadline(async {
            let mut tx = pool.begin().await?;
            let task: Option<DbId> =
                sqlx::query_scalar("SELECT id FROM tasks WHERE id = $1 FOR UPDATE")
                    .bind(task_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if task.is_none() {
                return Ok(None);
            }

            let query = format!(
                "INSERT INTO steps (task_id, position, description) \
                 VALUES ($1, \
                         (SELECT COALESCE(MAX(position), 0) + 1 FROM steps WHERE task_id = $1), \
                         $2) \
                 RETURNING {COLUMNS}"
            );
            let step = sqlx::query_as::<_, Step>(&query)
                .bind(task_id)
                .bind(description)
                .fetch_one(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(Some(step))
        })
        .await
    }

    pub async fn find(pool: &PgPool, task_id: DbId, id: DbId) -> Result<Option<Step>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM steps WHERE id = $1 AND task_id = $2");
        deadline(
            sqlx::query_as::<_, Step>(&query)
                .bind(id)
                .bind(task_id)
                .fetch_optional(pool),
        )
        .await
    }

    pub async fn update(
        pool: &PgPool,
        task_id: DbId,
        id: DbId,
        input: &UpdateStep,
    ) -> Result<Option<Step>, DbError> {
        let query = format!(
            "UPDATE steps SET \
                 description = COALESCE($3, description), \
                 completed_at = CASE \
                     WHEN $4::boolean IS NULL THEN completed_at \
                     WHEN $4 THEN COALESCE(completed_at, NOW()) \
                     ELSE NULL END \
             WHERE id = $1 AND task_id = $2 \
             RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, Step>(&query)
                .bind(id)
                .bind(task_id)
                .bind(&input.description)
                .bind(input.completed)
                .fetch_optional(pool),
        )
        .await
    }

    /// Delete a step and close the gap it leaves.
    pub async fn delete(pool: &PgPool, task_id: DbId, id: DbId) -> Result<bool, DbError> {
        deadline(async {
            let mut tx = pool.begin().await?;
            sqlx::query("SELECT id FROM tasks WHERE id = $1 FOR UPDATE")
                .bind(task_id)
                .execute(&mut *tx)
                .await?;

            let position: Option<i32> = sqlx::query_scalar(
                "DELETE FROM steps WHERE id = $1 AND task_id = $2 RETURNING position",
            )
            .bind(id)
            .bind(task_id)
            .fetch_optional(&mut *tx)
            .await?;
            let Some(position) = position else {
                return Ok(false);
            };

            sqlx::query(
                "UPDATE steps SET position = position - 1 \
                 WHERE task_id = $1 AND position > $2",
            )
            .bind(task_id)
            .bind(position)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(true)
        })
        .await
    }
}

//! Repository for the `tasks` table.
//!
//! Positions are 1-based and dense within a list, archived tasks included.
//! Every statement that changes positions runs in a transaction that first
//! locks the affected list rows, so concurrent writers to the same list
//! serialize. The `(list_id, position_in_list)` unique constraint is
//! deferred, which lets a block of positions shift in one statement.

use noda_core::query::CollectionQuery;
use noda_core::task::{clamp_position, TaskStatus};
use noda_core::text::like_pattern;
use noda_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::{deadline, DbError};

const COLUMNS: &str = "\
    id, owner_id, list_id, position_in_list, title, headline, description, \
    priority, status, is_pinned, is_archived, due_date, remind_at, \
    completed_at, archived_at, created_at, updated_at";

pub const SORTABLE: &[&str] = &[
    "title",
    "priority",
    "due_date",
    "remind_at",
    "position_in_list",
    "created_at",
    "updated_at",
];

/// Pinned first, then by position.
const DEFAULT_ORDER: &str = "is_pinned DESC, position_in_list ASC, id ASC";

pub struct TaskRepo;

impl TaskRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a task under its owner, optionally requiring a specific list.
    pub async fn find(
        pool: &PgPool,
        owner_id: DbId,
        list_id: Option<DbId>,
        id: DbId,
    ) -> Result<Option<Task>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE id = $1 AND owner_id = $2 \
               AND ($3::uuid IS NULL OR list_id = $3)"
        );
        deadline(
            sqlx::query_as::<_, Task>(&query)
                .bind(id)
                .bind(owner_id)
                .bind(list_id)
                .fetch_optional(pool),
        )
        .await
    }

    /// Page through an owner's tasks. `search` matches the title.
    pub async fn list(
        pool: &PgPool,
        owner_id: DbId,
        filter: TaskFilter,
        params: &CollectionQuery,
    ) -> Result<Vec<Task>, DbError> {
        let (scope_clause, list_id) = match filter {
            TaskFilter::InList(list_id) => ("AND list_id = $5 AND NOT is_archived ", Some(list_id)),
            TaskFilter::Active => ("AND NOT is_archived ", None),
            TaskFilter::Trashed => ("AND is_archived ", None),
        };
        let order = params.order_by(SORTABLE, DEFAULT_ORDER);
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE owner_id = $1 {scope_clause}\
               AND ($2::text IS NULL OR title ILIKE $2) \
             ORDER BY {order} \
             LIMIT $3 OFFSET $4"
        );
        let pattern = params.search.as_deref().map(like_pattern);
        let mut q = sqlx::query_as::<_, Task>(&query)
            .bind(owner_id)
            .bind(pattern)
            .bind(params.pagination.limit())
            .bind(params.pagination.offset());
        if let Some(list_id) = list_id {
            q = q.bind(list_id);
        }
        deadline(q.fetch_all(pool)).await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Append a task at the end of a list.
    ///
    /// Returns `None` if the list does not exist under the owner.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        list_id: DbId,
        input: &CreateTask,
    ) -> Result<Option<Task>, DbError> {
        deadline(async {
            let mut tx = pool.begin().await?;
            if lock_lists(&mut tx, owner_id, &[list_id]).await? != 1 {
                return Ok(None);
            }

            let query = format!(
                "INSERT INTO tasks \
                     (owner_id, list_id, position_in_list, title, headline, description, \
                      priority, due_date, remind_at) \
                 VALUES ($1, $2, \
                         (SELECT COALESCE(MAX(position_in_list), 0) + 1 \
                          FROM tasks WHERE list_id = $2), \
                         $3, $4, $5, $6, $7, $8) \
                 RETURNING {COLUMNS}"
            );
            let task = sqlx::query_as::<_, Task>(&query)
                .bind(owner_id)
                .bind(list_id)
                .bind(&input.title)
                .bind(&input.headline)
                .bind(&input.description)
                .bind(input.priority.as_str())
                .bind(input.due_date)
                .bind(input.remind_at)
                .fetch_one(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(Some(task))
        })
        .await
    }

    /// Apply a partial update. Returns `None` if the task is not in the list.
    pub async fn update(
        pool: &PgPool,
        owner_id: DbId,
        list_id: DbId,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, DbError> {
        let query = format!(
            "UPDATE tasks SET \
                 title = COALESCE($4, title), \
                 headline = COALESCE($5, headline), \
                 description = COALESCE($6, description), \
                 priority = COALESCE($7, priority), \
                 due_date = CASE WHEN $8 THEN $9 ELSE due_date END, \
                 remind_at = CASE WHEN $10 THEN $11 ELSE remind_at END \
             WHERE id = $1 AND owner_id = $2 AND list_id = $3 \
             RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, Task>(&query)
                .bind(id)
                .bind(owner_id)
                .bind(list_id)
                .bind(&input.title)
                .bind(&input.headline)
                .bind(&input.description)
                .bind(input.priority.map(|p| p.as_str()))
                .bind(input.due_date.is_some())
                .bind(input.due_date.flatten())
                .bind(input.remind_at.is_some())
                .bind(input.remind_at.flatten())
                .fetch_optional(pool),
        )
        .await
    }

    /// Store a new status, stamping or clearing `completed_at`.
    pub async fn set_status(
        pool: &PgPool,
        owner_id: DbId,
        list_id: DbId,
        id: DbId,
        status: TaskStatus,
    ) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query(
                "UPDATE tasks SET \
                     status = $4, \
                     completed_at = CASE WHEN $4 = 'complete' \
                                         THEN COALESCE(completed_at, NOW()) END \
                 WHERE id = $1 AND owner_id = $2 AND list_id = $3",
            )
            .bind(id)
            .bind(owner_id)
            .bind(list_id)
            .bind(status.as_str())
            .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_pinned(
        pool: &PgPool,
        owner_id: DbId,
        list_id: DbId,
        id: DbId,
        pinned: bool,
    ) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query(
                "UPDATE tasks SET is_pinned = $4 \
                 WHERE id = $1 AND owner_id = $2 AND list_id = $3",
            )
            .bind(id)
            .bind(owner_id)
            .bind(list_id)
            .bind(pinned)
            .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Trash (`true`) or restore (`false`) a task. Its position is kept.
    pub async fn set_archived(
        pool: &PgPool,
        owner_id: DbId,
        list_id: DbId,
        id: DbId,
        archived: bool,
    ) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query(
                "UPDATE tasks SET \
                     is_archived = $4, \
                     archived_at = CASE WHEN $4 THEN COALESCE(archived_at, NOW()) END \
                 WHERE id = $1 AND owner_id = $2 AND list_id = $3",
            )
            .bind(id)
            .bind(owner_id)
            .bind(list_id)
            .bind(archived)
            .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a task to the end of another list and close the gap it leaves.
    ///
    /// Returns `false` if the task or either list does not exist under the
    /// owner. Moving a task to the list it is already in is a no-op.
    pub async fn relocate(
        pool: &PgPool,
        owner_id: DbId,
        list_id: DbId,
        id: DbId,
        target_list_id: DbId,
    ) -> Result<bool, DbError> {
        deadline(async {
            let mut tx = pool.begin().await?;
            let wanted = if list_id == target_list_id { 1 } else { 2 };
            if lock_lists(&mut tx, owner_id, &[list_id, target_list_id]).await? != wanted {
                return Ok(false);
            }
            let Some(old_position) = lock_task(&mut tx, owner_id, list_id, id).await? else {
                return Ok(false);
            };
            if list_id == target_list_id {
                return Ok(true);
            }

            sqlx::query(
                "UPDATE tasks SET \
                     list_id = $2, \
                     position_in_list = (SELECT COALESCE(MAX(position_in_list), 0) + 1 \
                                         FROM tasks WHERE list_id = $2) \
                 WHERE id = $1",
            )
            .bind(id)
            .bind(target_list_id)
            .execute(&mut *tx)
            .await?;

            close_gap(&mut tx, list_id, old_position).await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(true)
        })
        .await
    }

    /// Move a task to `requested` within its list, shifting its neighbours.
    ///
    /// The destination is clamped into `[1, count]`. Returns the position
    /// actually taken, or `None` if the task is not in the list.
    pub async fn reorder(
        pool: &PgPool,
        owner_id: DbId,
        list_id: DbId,
        id: DbId,
        requested: i64,
    ) -> Result<Option<i32>, DbError> {
        deadline(async {
            let mut tx = pool.begin().await?;
            if lock_lists(&mut tx, owner_id, &[list_id]).await? != 1 {
                return Ok(None);
            }
            let Some(old_position) = lock_task(&mut tx, owner_id, list_id, id).await? else {
                return Ok(None);
            };

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE list_id = $1")
                .bind(list_id)
                .fetch_one(&mut *tx)
                .await?;
            let new_position = clamp_position(requested, count);

            if new_position < old_position {
                sqlx::query(
                    "UPDATE tasks SET position_in_list = position_in_list + 1 \
                     WHERE list_id = $1 AND position_in_list >= $2 AND position_in_list < $3",
                )
                .bind(list_id)
                .bind(new_position)
                .bind(old_position)
                .execute(&mut *tx)
                .await?;
            } else if new_position > old_position {
                sqlx::query(
                    "UPDATE tasks SET position_in_list = position_in_list - 1 \
                     WHERE list_id = $1 AND position_in_list > $2 AND position_in_list <= $3",
                )
                .bind(list_id)
                .bind(old_position)
                .bind(new_position)
                .execute(&mut *tx)
                .await?;
            }

            if new_position != old_position {
                sqlx::query("UPDATE tasks SET position_in_list = $2 WHERE id = $1")
                    .bind(id)
                    .bind(new_position)
                    .execute(&mut *tx)
                    .await?;
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(Some(new_position))
        })
        .await
    }

    /// Hard-delete a task and close the gap it leaves.
    pub async fn delete(
        pool: &PgPool,
        owner_id: DbId,
        list_id: DbId,
        id: DbId,
    ) -> Result<bool, DbError> {
        deadline(async {
            let mut tx = pool.begin().await?;
            if lock_lists(&mut tx, owner_id, &[list_id]).await? != 1 {
                return Ok(false);
            }
            let position: Option<i32> = sqlx::query_scalar(
                "DELETE FROM tasks WHERE id = $1 AND owner_id = $2 AND list_id = $3 \
                 RETURNING position_in_list",
            )
            .bind(id)
            .bind(owner_id)
            .bind(list_id)
            .fetch_optional(&mut *tx)
            .await?;
            let Some(position) = position else {
                return Ok(false);
            };

            close_gap(&mut tx, list_id, position).await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(true)
        })
        .await
    }
}

/// Lock the owner's lists among `ids`, in id order. Returns how many exist.
async fn lock_lists(
    tx: &mut Transaction<'_, Postgres>,
    owner_id: DbId,
    ids: &[DbId],
) -> Result<usize, sqlx::Error> {
    let locked: Vec<DbId> = sqlx::query_scalar(
        "SELECT id FROM lists WHERE id = ANY($1) AND owner_id = $2 ORDER BY id FOR UPDATE",
    )
    .bind(ids)
    .bind(owner_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(locked.len())
}

/// Lock a task row and return its current position.
async fn lock_task(
    tx: &mut Transaction<'_, Postgres>,
    owner_id: DbId,
    list_id: DbId,
    id: DbId,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT position_in_list FROM tasks \
         WHERE id = $1 AND owner_id = $2 AND list_id = $3 \
         FOR UPDATE",
    )
    .bind(id)
    .bind(owner_id)
    .bind(list_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Shift every task after `removed` up by one.
async fn close_gap(
    tx: &mut Transaction<'_, Postgres>,
    list_id: DbId,
    removed: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE tasks SET position_in_list = position_in_list - 1 \
         WHERE list_id = $1 AND position_in_list > $2",
    )
    .bind(list_id)
    .bind(removed)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

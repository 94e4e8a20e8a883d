//! Repository for the `lists` table.
//!
//! Queries are scoped by `owner_id`. Statements that re-parent or delete a
//! list also require `kind = 'regular'`, so reserved lists are never touched
//! even if a caller skips the service-level refusal.

use noda_core::lists::ListKind;
use noda_core::query::CollectionQuery;
use noda_core::text::like_pattern;
use noda_core::types::DbId;
use sqlx::PgPool;

use crate::models::list::{CreateList, List, ListFilter, UpdateList};
use crate::{deadline, DbError};

const COLUMNS: &str = "id, owner_id, group_id, name, description, kind, created_at, updated_at";

pub const SORTABLE: &[&str] = &["name", "description", "created_at", "updated_at"];

const DEFAULT_ORDER: &str = "created_at ASC, id ASC";

pub struct ListRepo;

impl ListRepo {
    /// Insert a regular list, grouped when `group_id` is set.
    pub async fn create(pool: &PgPool, owner_id: DbId, input: &CreateList) -> Result<List, DbError> {
        let query = format!(
            "INSERT INTO lists (owner_id, group_id, name, description) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, List>(&query)
                .bind(owner_id)
                .bind(input.group_id)
                .bind(&input.name)
                .bind(&input.description)
                .fetch_one(pool),
        )
        .await
    }

    /// Find a list under its owner. With `group_id` set the list must also
    /// belong to that group.
    pub async fn find(
        pool: &PgPool,
        owner_id: DbId,
        group_id: Option<DbId>,
        id: DbId,
    ) -> Result<Option<List>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM lists \
             WHERE id = $1 AND owner_id = $2 \
               AND ($3::uuid IS NULL OR group_id = $3)"
        );
        deadline(
            sqlx::query_as::<_, List>(&query)
                .bind(id)
                .bind(owner_id)
                .bind(group_id)
                .fetch_optional(pool),
        )
        .await
    }

    /// Look up one of the owner's reserved lists.
    pub async fn find_reserved(
        pool: &PgPool,
        owner_id: DbId,
        kind: ListKind,
    ) -> Result<Option<List>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM lists WHERE owner_id = $1 AND kind = $2");
        deadline(
            sqlx::query_as::<_, List>(&query)
                .bind(owner_id)
                .bind(kind.as_str())
                .fetch_optional(pool),
        )
        .await
    }

    /// Page through an owner's lists. `search` matches the name.
    pub async fn list(
        pool: &PgPool,
        owner_id: DbId,
        filter: ListFilter,
        params: &CollectionQuery,
    ) -> Result<Vec<List>, DbError> {
        let (scope_clause, group_id) = match filter {
            ListFilter::All => ("", None),
            ListFilter::Scattered => ("AND group_id IS NULL ", None),
            ListFilter::InGroup(group_id) => ("AND group_id = $5 ", Some(group_id)),
        };
        let order = params.order_by(SORTABLE, DEFAULT_ORDER);
        let query = format!(
            "SELECT {COLUMNS} FROM lists \
             WHERE owner_id = $1 {scope_clause}\
               AND ($2::text IS NULL OR name ILIKE $2) \
             ORDER BY {order} \
             LIMIT $3 OFFSET $4"
        );
        let pattern = params.search.as_deref().map(like_pattern);
        let mut q = sqlx::query_as::<_, List>(&query)
            .bind(owner_id)
            .bind(pattern)
            .bind(params.pagination.limit())
            .bind(params.pagination.offset());
        if let Some(group_id) = group_id {
            q = q.bind(group_id);
        }
        deadline(q.fetch_all(pool)).await
    }

    /// Returns `None` if no such list exists under the owner.
    pub async fn update(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        input: &UpdateList,
    ) -> Result<Option<List>, DbError> {
        let query = format!(
            "UPDATE lists SET \
                 name = COALESCE($3, name), \
                 description = COALESCE($4, description) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, List>(&query)
                .bind(id)
                .bind(owner_id)
                .bind(&input.name)
                .bind(&input.description)
                .fetch_optional(pool),
        )
        .await
    }

    /// Re-parent a regular list; `None` scatters it.
    ///
    /// Returns `true` if a list was updated.
    pub async fn set_group(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
        group_id: Option<DbId>,
    ) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query(
                "UPDATE lists SET group_id = $3 \
                 WHERE id = $1 AND owner_id = $2 AND kind = 'regular'",
            )
            .bind(id)
            .bind(owner_id)
            .bind(group_id)
            .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a regular list together with its tasks.
    pub async fn delete(pool: &PgPool, owner_id: DbId, id: DbId) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query("DELETE FROM lists WHERE id = $1 AND owner_id = $2 AND kind = 'regular'")
                .bind(id)
                .bind(owner_id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deep-copy a list: the replica keeps name, description and parent
    /// group and receives copies of every task with its position, steps and
    /// tag links. A reserved source yields a regular scattered list.
    ///
    /// Returns `None` if the source does not exist under the owner.
    pub async fn duplicate(
        pool: &PgPool,
        owner_id: DbId,
        id: DbId,
    ) -> Result<Option<List>, DbError> {
        deadline(async {
            let mut tx = pool.begin().await?;

            let query = format!(
                "SELECT {COLUMNS} FROM lists WHERE id = $1 AND owner_id = $2 FOR SHARE"
            );
            let Some(source) = sqlx::query_as::<_, List>(&query)
                .bind(id)
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await?
            else {
                return Ok(None);
            };

            let group_id = if source.kind.is_reserved() {
                None
            } else {
                source.group_id
            };
            let query = format!(
                "INSERT INTO lists (owner_id, group_id, name, description) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING {COLUMNS}"
            );
            let replica = sqlx::query_as::<_, List>(&query)
                .bind(owner_id)
                .bind(group_id)
                .bind(&source.name)
                .bind(&source.description)
                .fetch_one(&mut *tx)
                .await?;

            let old_ids: Vec<DbId> =
                sqlx::query_scalar("SELECT id FROM tasks WHERE list_id = $1 ORDER BY position_in_list")
                    .bind(source.id)
                    .fetch_all(&mut *tx)
                    .await?;
            if !old_ids.is_empty() {
                let new_ids: Vec<DbId> = old_ids.iter().map(|_| uuid::Uuid::new_v4()).collect();
                copy_task_tree(&mut tx, replica.id, &old_ids, &new_ids).await?;
            }

            tx.commit().await?;
            Ok::<_, sqlx::Error>(Some(replica))
        })
        .await
    }
}

/// Copy tasks, steps and tag links, mapping `old_ids[i]` to `new_ids[i]`.
async fn copy_task_tree(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    list_id: DbId,
    old_ids: &[DbId],
    new_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO tasks \
             (id, owner_id, list_id, position_in_list, title, headline, description, \
              priority, status, is_pinned, is_archived, due_date, remind_at, \
              completed_at, archived_at) \
         SELECT m.new_id, t.owner_id, $3, t.position_in_list, t.title, t.headline, \
                t.description, t.priority, t.status, t.is_pinned, t.is_archived, \
                t.due_date, t.remind_at, t.completed_at, t.archived_at \
         FROM UNNEST($1::uuid[], $2::uuid[]) AS m(old_id, new_id) \
         JOIN tasks t ON t.id = m.old_id",
    )
    .bind(old_ids)
    .bind(new_ids)
    .bind(list_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        "INSERT INTO steps (task_id, position, description, completed_at) \
         SELECT m.new_id, s.position, s.description, s.completed_at \
         FROM UNNEST($1::uuid[], $2::uuid[]) AS m(old_id, new_id) \
         JOIN steps s ON s.task_id = m.old_id",
    )
    .bind(old_ids)
    .bind(new_ids)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        "INSERT INTO task_tags (task_id, tag_id) \
         SELECT m.new_id, tt.tag_id \
         FROM UNNEST($1::uuid[], $2::uuid[]) AS m(old_id, new_id) \
         JOIN task_tags tt ON tt.task_id = m.old_id",
    )
    .bind(old_ids)
    .bind(new_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

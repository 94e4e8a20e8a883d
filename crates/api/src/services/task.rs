//! Tasks: creation, partial updates, status transitions and placement.
//!
//! Every operation addressed through a list first resolves the task under
//! that list and the caller, so a task reached through the wrong list is
//! reported as missing.

use noda_core::error::CoreError;
use noda_core::limits::{TASK_DESCRIPTION_MAX, TASK_HEADLINE_MAX, TASK_TITLE_MAX};
use noda_core::lists::ListKind;
use noda_core::query::CollectionQuery;
use noda_core::task::{check_schedule, Priority, Transition, DEFAULT_TITLE};
use noda_core::text::{bounded, patch};
use noda_core::types::{DbId, Timestamp};
use noda_db::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use noda_db::repositories::TaskRepo;
use noda_db::DbPool;
use serde::{Deserialize, Deserializer};

use super::{resolve_list, resolve_task, TaskPath, Update};

const CONTEXT: &str = "Task";

/// Request body for `POST /me/lists/{list_uuid}/tasks`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<Timestamp>,
    #[serde(default)]
    pub remind_at: Option<Timestamp>,
}

/// Request body for `PATCH` on a task.
///
/// For `due_date` and `remind_at`, an absent key keeps the stored value and
/// an explicit `null` clears it.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "present")]
    pub remind_at: Option<Option<Timestamp>>,
}

/// Request body for `POST .../move`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveTask {
    #[serde(default)]
    pub list_id: String,
}

/// Request body for `POST .../reorder`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reorder {
    pub position: i64,
}

/// A key that is present, possibly `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub async fn create(
    pool: &DbPool,
    owner_id: DbId,
    list_id: DbId,
    input: NewTask,
) -> Result<Task, CoreError> {
    let title = bounded(CONTEXT, "title", &input.title, TASK_TITLE_MAX)?;
    let input = CreateTask {
        title: if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        },
        headline: bounded(CONTEXT, "headline", &input.headline, TASK_HEADLINE_MAX)?,
        description: bounded(CONTEXT, "description", &input.description, TASK_DESCRIPTION_MAX)?,
        priority: input.priority.unwrap_or_default(),
        due_date: input.due_date,
        remind_at: input.remind_at,
    };
    check_schedule(input.due_date, input.remind_at)?;

    resolve_list(pool, owner_id, None, list_id).await?;
    let task = TaskRepo::create(pool, owner_id, list_id, &input)
        .await?
        .ok_or(CoreError::ListNotFound)?;
    tracing::debug!(user_id = %owner_id, task_id = %task.id, "Task created");
    Ok(task)
}

pub async fn get(
    pool: &DbPool,
    owner_id: DbId,
    list_id: Option<DbId>,
    id: DbId,
) -> Result<Task, CoreError> {
    resolve_task(pool, owner_id, list_id, id).await
}

pub async fn list(
    pool: &DbPool,
    owner_id: DbId,
    filter: TaskFilter,
    params: &CollectionQuery,
) -> Result<Vec<Task>, CoreError> {
    if let TaskFilter::InList(list_id) = filter {
        resolve_list(pool, owner_id, None, list_id).await?;
    }
    Ok(TaskRepo::list(pool, owner_id, filter, params).await?)
}

pub async fn update(pool: &DbPool, at: TaskPath, input: TaskPatch) -> Result<Update, CoreError> {
    let changes = UpdateTask {
        title: patch(CONTEXT, "title", input.title.as_deref(), TASK_TITLE_MAX)?,
        headline: patch(CONTEXT, "headline", input.headline.as_deref(), TASK_HEADLINE_MAX)?,
        description: patch(
            CONTEXT,
            "description",
            input.description.as_deref(),
            TASK_DESCRIPTION_MAX,
        )?,
        priority: input.priority,
        due_date: input.due_date,
        remind_at: input.remind_at,
    };
    let task = at.resolve(pool).await?;
    let TaskPath { owner_id, list_id, task_id: id } = at;
    if changes.is_empty() {
        return Ok(Update::Nothing);
    }

    check_schedule(
        changes.due_date.unwrap_or(task.due_date),
        changes.remind_at.unwrap_or(task.remind_at),
    )?;

    TaskRepo::update(pool, owner_id, list_id, id, &changes)
        .await?
        .ok_or(CoreError::TaskNotFound)?;
    Ok(Update::Applied)
}

/// `complete` or `resume`.
pub async fn transition(
    pool: &DbPool,
    at: TaskPath,
    transition: Transition,
) -> Result<(), CoreError> {
    at.resolve(pool).await?;
    let TaskPath { owner_id, list_id, task_id: id } = at;
    if !TaskRepo::set_status(pool, owner_id, list_id, id, transition.target()).await? {
        return Err(CoreError::TaskNotFound);
    }
    Ok(())
}

pub async fn set_pinned(pool: &DbPool, at: TaskPath, pinned: bool) -> Result<(), CoreError> {
    at.resolve(pool).await?;
    let TaskPath { owner_id, list_id, task_id: id } = at;
    if !TaskRepo::set_pinned(pool, owner_id, list_id, id, pinned).await? {
        return Err(CoreError::TaskNotFound);
    }
    Ok(())
}

/// `trash` (archive) or `restore`. The stored status is untouched, so a
/// restored task comes back in the state it was trashed in.
pub async fn set_archived(pool: &DbPool, at: TaskPath, archived: bool) -> Result<(), CoreError> {
    at.resolve(pool).await?;
    let TaskPath { owner_id, list_id, task_id: id } = at;
    if !TaskRepo::set_archived(pool, owner_id, list_id, id, archived).await? {
        return Err(CoreError::TaskNotFound);
    }
    Ok(())
}

/// Move a task to the end of another of the caller's lists.
pub async fn move_to_list(
    pool: &DbPool,
    at: TaskPath,
    target_list_id: DbId,
) -> Result<(), CoreError> {
    at.resolve(pool).await?;
    let TaskPath { owner_id, list_id, task_id: id } = at;
    resolve_list(pool, owner_id, None, target_list_id).await?;

    if !TaskRepo::relocate(pool, owner_id, list_id, id, target_list_id).await? {
        return Err(CoreError::TaskNotFound);
    }
    tracing::debug!(user_id = %owner_id, task_id = %id, list_id = %target_list_id, "Task moved");
    Ok(())
}

/// `today`, `tomorrow` or `defer`: move into one of the reserved lists.
pub async fn move_to_reserved(
    pool: &DbPool,
    at: TaskPath,
    kind: ListKind,
) -> Result<(), CoreError> {
    at.resolve(pool).await?;
    let TaskPath { owner_id, list_id, task_id: id } = at;
    let target = super::list::reserved(pool, owner_id, kind).await?;

    if !TaskRepo::relocate(pool, owner_id, list_id, id, target.id).await? {
        return Err(CoreError::TaskNotFound);
    }
    Ok(())
}

/// Move a task within its list. Returns the position it landed on.
pub async fn reorder(pool: &DbPool, at: TaskPath, position: i64) -> Result<i32, CoreError> {
    at.resolve(pool).await?;
    let TaskPath { owner_id, list_id, task_id: id } = at;
    TaskRepo::reorder(pool, owner_id, list_id, id, position)
        .await?
        .ok_or(CoreError::TaskNotFound)
}

pub async fn delete(pool: &DbPool, at: TaskPath) -> Result<(), CoreError> {
    at.resolve(pool).await?;
    let TaskPath { owner_id, list_id, task_id: id } = at;
    if !TaskRepo::delete(pool, owner_id, list_id, id).await? {
        return Err(CoreError::TaskNotFound);
    }
    tracing::debug!(user_id = %owner_id, task_id = %id, "Task deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let absent: TaskPatch = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(absent.due_date, None);

        let cleared: TaskPatch = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: TaskPatch =
            serde_json::from_str(r#"{"remind_at": "2030-01-01T00:00:00Z"}"#).unwrap();
        assert!(matches!(set.remind_at, Some(Some(_))));
    }

    #[test]
    fn unknown_priority_is_rejected() {
        assert!(serde_json::from_str::<NewTask>(r#"{"priority": "urgent"}"#).is_err());
        let task: NewTask = serde_json::from_str(r#"{"priority": "high"}"#).unwrap();
        assert_eq!(task.priority, Some(Priority::High));
    }
}

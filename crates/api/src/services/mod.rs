//! Domain services.
//!
//! Services normalize input, enforce the structural rules of the domain and
//! call the repositories. They return [`CoreError`] so handlers only decide
//! how to answer.
//!
//! Repository lookups are scoped by owner, so a miss cannot tell a missing
//! resource from a missing ancestor. The `resolve_*` helpers walk back up
//! the ownership chain on a miss and report the first link that is gone:
//! the user, then the group, then the list, then the resource itself.

use noda_core::error::CoreError;
use noda_core::types::DbId;
use noda_db::models::group::Group;
use noda_db::models::list::List;
use noda_db::models::task::Task;
use noda_db::repositories::{GroupRepo, ListRepo, TaskRepo, UserRepo};
use noda_db::DbPool;

pub mod attachment;
pub mod auth;
pub mod group;
pub mod list;
pub mod setting;
pub mod step;
pub mod tag;
pub mod task;
pub mod user;

/// Result of a partial update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Something was written.
    Applied,
    /// The payload carried nothing to change.
    Nothing,
}

/// A task addressed through its list, as in `/me/lists/{l}/tasks/{t}`.
#[derive(Debug, Clone, Copy)]
pub struct TaskPath {
    pub owner_id: DbId,
    pub list_id: DbId,
    pub task_id: DbId,
}

impl TaskPath {
    pub async fn resolve(self, pool: &DbPool) -> Result<Task, CoreError> {
        resolve_task(pool, self.owner_id, Some(self.list_id), self.task_id).await
    }
}

/// Fail with `UserNoLongerExists` unless the caller is still an active user.
pub async fn ensure_user(pool: &DbPool, owner_id: DbId) -> Result<(), CoreError> {
    if UserRepo::is_active(pool, owner_id).await? {
        Ok(())
    } else {
        Err(CoreError::UserNoLongerExists)
    }
}

pub async fn resolve_group(
    pool: &DbPool,
    owner_id: DbId,
    group_id: DbId,
) -> Result<Group, CoreError> {
    if let Some(group) = GroupRepo::find(pool, owner_id, group_id).await? {
        return Ok(group);
    }
    ensure_user(pool, owner_id).await?;
    Err(CoreError::GroupNotFound)
}

/// Find a list, inside `group_id` when given.
pub async fn resolve_list(
    pool: &DbPool,
    owner_id: DbId,
    group_id: Option<DbId>,
    list_id: DbId,
) -> Result<List, CoreError> {
    if let Some(list) = ListRepo::find(pool, owner_id, group_id, list_id).await? {
        return Ok(list);
    }
    ensure_user(pool, owner_id).await?;
    if let Some(group_id) = group_id {
        resolve_group(pool, owner_id, group_id).await?;
    }
    Err(CoreError::ListNotFound)
}

/// Find a task, inside `list_id` when given.
pub async fn resolve_task(
    pool: &DbPool,
    owner_id: DbId,
    list_id: Option<DbId>,
    task_id: DbId,
) -> Result<Task, CoreError> {
    if let Some(task) = TaskRepo::find(pool, owner_id, list_id, task_id).await? {
        return Ok(task);
    }
    match list_id {
        Some(list_id) => {
            resolve_list(pool, owner_id, None, list_id).await?;
        }
        None => ensure_user(pool, owner_id).await?,
    }
    Err(CoreError::TaskNotFound)
}

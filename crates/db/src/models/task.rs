//! Task entity model and DTOs.

use noda_core::task::{Priority, TaskState, TaskStatus};
use noda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `tasks` table.
///
/// `status` is the stored value. Use [`Task::into_response`] to expose the
/// computed state to clients.
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: DbId,
    pub owner_id: DbId,
    pub list_id: DbId,
    pub position_in_list: i32,
    pub title: String,
    pub headline: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub due_date: Option<Timestamp>,
    pub remind_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Client-facing task with the computed `status`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: DbId,
    pub owner_id: DbId,
    pub list_id: DbId,
    pub position_in_list: i32,
    pub title: String,
    pub headline: String,
    pub description: String,
    pub priority: Priority,
    pub status: TaskState,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub due_date: Option<Timestamp>,
    pub remind_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub archived_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn into_response(self, now: Timestamp) -> TaskResponse {
        TaskResponse {
            status: TaskState::of(self.status, self.due_date, now),
            id: self.id,
            owner_id: self.owner_id,
            list_id: self.list_id,
            position_in_list: self.position_in_list,
            title: self.title,
            headline: self.headline,
            description: self.description,
            priority: self.priority,
            is_pinned: self.is_pinned,
            is_archived: self.is_archived,
            due_date: self.due_date,
            remind_at: self.remind_at,
            completed_at: self.completed_at,
            archived_at: self.archived_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Normalized data for a new task. The position is assigned on insert.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub headline: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub remind_at: Option<Timestamp>,
}

/// Partial task update.
///
/// For the nullable dates the outer `Option` says whether the field is
/// being set and the inner one carries the new value (`None` clears it).
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<Timestamp>>,
    pub remind_at: Option<Option<Timestamp>>,
}

impl UpdateTask {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.headline.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.remind_at.is_none()
    }
}

/// Which tasks of an owner a collection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    /// Non-archived tasks of one list.
    InList(DbId),
    /// Non-archived tasks across every list.
    Active,
    /// Archived tasks across every list.
    Trashed,
}

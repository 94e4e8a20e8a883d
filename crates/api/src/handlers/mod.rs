//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers parse path segments, delegate to [`crate::services`] and shape
//! the response; domain errors are mapped via [`crate::error::AppError`].

pub mod attachments;
pub mod auth;
pub mod fallback;
pub mod groups;
pub mod lists;
pub mod me;
pub mod settings;
pub mod steps;
pub mod tags;
pub mod tasks;
pub mod users;

/// Canonical URLs used as `Location` targets after no-op updates.
pub(crate) mod location {
    use noda_core::types::DbId;

    pub fn me() -> String {
        "/me".to_string()
    }

    pub fn group(group_id: DbId) -> String {
        format!("/me/groups/{group_id}")
    }

    pub fn list(group_id: Option<DbId>, list_id: DbId) -> String {
        match group_id {
            Some(group_id) => format!("/me/groups/{group_id}/lists/{list_id}"),
            None => format!("/me/lists/{list_id}"),
        }
    }

    pub fn task(list_id: DbId, task_id: DbId) -> String {
        format!("/me/lists/{list_id}/tasks/{task_id}")
    }

    pub fn step(list_id: DbId, task_id: DbId, step_id: DbId) -> String {
        format!("/me/lists/{list_id}/tasks/{task_id}/steps/{step_id}")
    }

    pub fn tag(tag_id: DbId) -> String {
        format!("/me/tags/{tag_id}")
    }
}

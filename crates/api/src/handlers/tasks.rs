//! Handlers for tasks.
//!
//! Tasks are addressed through their list (`/me/lists/{l}/tasks/{t}`) for
//! every write. The read-only `/me/tasks` family spans all of the caller's
//! lists.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use noda_core::ids::parse_id;
use noda_core::lists::ListKind;
use noda_core::query::Pagination;
use noda_core::task::Transition;
use noda_core::types::DbId;
use noda_db::models::task::{Task, TaskFilter, TaskResponse};
use serde::Serialize;

use super::location;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{updated, Collection, Created};
use crate::services::task::{self, MoveTask, NewTask, Reorder, TaskPatch};
use crate::services::TaskPath;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TaskCreated {
    pub task_id: DbId,
}

/// Parse the `{list_uuid}/tasks/{task_uuid}` segments for the caller.
pub(crate) fn task_path(auth: AuthUser, list: &str, task: &str) -> AppResult<TaskPath> {
    Ok(TaskPath {
        owner_id: auth.user_id,
        list_id: parse_id("list_uuid", list)?,
        task_id: parse_id("task_uuid", task)?,
    })
}

fn page(pagination: Pagination, tasks: Vec<Task>) -> Collection<TaskResponse> {
    let now = Utc::now();
    let payload = tasks.into_iter().map(|t| t.into_response(now)).collect();
    Collection::new(pagination, payload)
}

// ---------------------------------------------------------------------------
// Across lists
// ---------------------------------------------------------------------------

/// GET /me/tasks
///
/// Every task of the caller that is not in the trash.
pub async fn list_all_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<TaskResponse>>> {
    let tasks = task::list(&state.pool, auth.user_id, TaskFilter::Active, &params).await?;
    Ok(Json(page(params.pagination, tasks)))
}

/// GET /me/tasks/trashed
pub async fn list_trashed_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<TaskResponse>>> {
    let tasks = task::list(&state.pool, auth.user_id, TaskFilter::Trashed, &params).await?;
    Ok(Json(page(params.pagination, tasks)))
}

/// GET /me/tasks/{task_uuid}
pub async fn get_any_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw): Path<String>,
) -> AppResult<Json<TaskResponse>> {
    let task_id = parse_id("task_uuid", &raw)?;
    let task = task::get(&state.pool, auth.user_id, None, task_id).await?;
    Ok(Json(task.into_response(Utc::now())))
}

// ---------------------------------------------------------------------------
// Within a list
// ---------------------------------------------------------------------------

/// GET /me/lists/{list_uuid}/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(list): Path<String>,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<TaskResponse>>> {
    let list_id = parse_id("list_uuid", &list)?;
    let filter = TaskFilter::InList(list_id);
    let tasks = task::list(&state.pool, auth.user_id, filter, &params).await?;
    Ok(Json(page(params.pagination, tasks)))
}

/// POST /me/lists/{list_uuid}/tasks
///
/// The task is appended at the end of the list.
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(list): Path<String>,
    JsonBody(input): JsonBody<NewTask>,
) -> AppResult<Created<TaskCreated>> {
    let list_id = parse_id("list_uuid", &list)?;
    let task = task::create(&state.pool, auth.user_id, list_id, input).await?;
    Ok(Created(TaskCreated { task_id: task.id }))
}

/// GET /me/lists/{list_uuid}/tasks/{task_uuid}
pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<Json<TaskResponse>> {
    let at = task_path(auth, &list, &task)?;
    let task = at.resolve(&state.pool).await?;
    Ok(Json(task.into_response(Utc::now())))
}

/// PATCH /me/lists/{list_uuid}/tasks/{task_uuid}
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
    JsonBody(input): JsonBody<TaskPatch>,
) -> AppResult<Response> {
    let at = task_path(auth, &list, &task)?;
    let outcome = task::update(&state.pool, at, input).await?;
    Ok(updated(outcome, location::task(at.list_id, at.task_id)))
}

/// DELETE /me/lists/{list_uuid}/tasks/{task_uuid}
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::delete(&state.pool, at).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Verbs
// ---------------------------------------------------------------------------

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/complete
pub async fn complete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::transition(&state.pool, at, Transition::Complete).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/resume
pub async fn resume_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::transition(&state.pool, at, Transition::Resume).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/pin
pub async fn pin_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::set_pinned(&state.pool, at, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/unpin
pub async fn unpin_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::set_pinned(&state.pool, at, false).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/trash
pub async fn trash_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::set_archived(&state.pool, at, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/restore
pub async fn restore_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::set_archived(&state.pool, at, false).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/today
pub async fn today_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::move_to_reserved(&state.pool, at, ListKind::Today).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/tomorrow
pub async fn tomorrow_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::move_to_reserved(&state.pool, at, ListKind::Tomorrow).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/defer
pub async fn defer_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    task::move_to_reserved(&state.pool, at, ListKind::Deferred).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/move
pub async fn move_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
    JsonBody(input): JsonBody<MoveTask>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    let target = parse_id("list_id", input.list_id.trim())?;
    task::move_to_list(&state.pool, at, target).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/reorder
///
/// Out-of-range positions are clamped into the list.
pub async fn reorder_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
    JsonBody(input): JsonBody<Reorder>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    let landed = task::reorder(&state.pool, at, input.position).await?;
    tracing::debug!(task_id = %at.task_id, position = landed, "Task reordered");
    Ok(StatusCode::NO_CONTENT)
}

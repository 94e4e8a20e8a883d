//! Handlers for `/me/lists/{list_uuid}/tasks/{task_uuid}/steps`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use noda_core::ids::parse_id;
use noda_core::types::DbId;
use noda_db::models::step::Step;
use serde::Serialize;

use super::location;
use super::tasks::task_path;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{updated, Collection, Created};
use crate::services::step::{self, NewStep, StepPatch};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StepCreated {
    pub step_id: DbId,
}

/// GET /me/lists/{list_uuid}/tasks/{task_uuid}/steps
pub async fn list_steps(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<Step>>> {
    let at = task_path(auth, &list, &task)?;
    let steps = step::list(&state.pool, at, &params).await?;
    Ok(Json(Collection::new(params.pagination, steps)))
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/steps
pub async fn create_step(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
    JsonBody(input): JsonBody<NewStep>,
) -> AppResult<Created<StepCreated>> {
    let at = task_path(auth, &list, &task)?;
    let step = step::create(&state.pool, at, input).await?;
    Ok(Created(StepCreated { step_id: step.id }))
}

/// GET /me/lists/{list_uuid}/tasks/{task_uuid}/steps/{step_uuid}
pub async fn get_step(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task, step)): Path<(String, String, String)>,
) -> AppResult<Json<Step>> {
    let at = task_path(auth, &list, &task)?;
    let step_id = parse_id("step_uuid", &step)?;
    Ok(Json(step::get(&state.pool, at, step_id).await?))
}

/// PATCH /me/lists/{list_uuid}/tasks/{task_uuid}/steps/{step_uuid}
pub async fn update_step(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task, step)): Path<(String, String, String)>,
    JsonBody(input): JsonBody<StepPatch>,
) -> AppResult<Response> {
    let at = task_path(auth, &list, &task)?;
    let step_id = parse_id("step_uuid", &step)?;
    let outcome = step::update(&state.pool, at, step_id, input).await?;
    Ok(updated(outcome, location::step(at.list_id, at.task_id, step_id)))
}

/// DELETE /me/lists/{list_uuid}/tasks/{task_uuid}/steps/{step_uuid}
pub async fn delete_step(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task, step)): Path<(String, String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    let step_id = parse_id("step_uuid", &step)?;
    step::delete(&state.pool, at, step_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

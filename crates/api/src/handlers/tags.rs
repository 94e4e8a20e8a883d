//! Handlers for `/me/tags` and the tag links of a task.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use noda_core::ids::parse_id;
use noda_core::types::DbId;
use noda_db::models::tag::Tag;
use serde::Serialize;

use super::location;
use super::tasks::task_path;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{updated, Collection, Created};
use crate::services::tag::{self, NewTag, TagPatch};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TagCreated {
    pub tag_id: DbId,
}

// ---------------------------------------------------------------------------
// Tag CRUD
// ---------------------------------------------------------------------------

/// GET /me/tags
pub async fn list_tags(
    State(state): State<AppState>,
    auth: AuthUser,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<Tag>>> {
    let tags = tag::list(&state.pool, auth.user_id, &params).await?;
    Ok(Json(Collection::new(params.pagination, tags)))
}

/// POST /me/tags
pub async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewTag>,
) -> AppResult<Created<TagCreated>> {
    let tag = tag::create(&state.pool, auth.user_id, input).await?;
    Ok(Created(TagCreated { tag_id: tag.id }))
}

/// GET /me/tags/{tag_uuid}
pub async fn get_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw): Path<String>,
) -> AppResult<Json<Tag>> {
    let tag_id = parse_id("tag_uuid", &raw)?;
    Ok(Json(tag::get(&state.pool, auth.user_id, tag_id).await?))
}

/// PATCH /me/tags/{tag_uuid}
pub async fn update_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw): Path<String>,
    JsonBody(input): JsonBody<TagPatch>,
) -> AppResult<Response> {
    let tag_id = parse_id("tag_uuid", &raw)?;
    let outcome = tag::update(&state.pool, auth.user_id, tag_id, input).await?;
    Ok(updated(outcome, location::tag(tag_id)))
}

/// DELETE /me/tags/{tag_uuid}
///
/// Unlinks the tag from every task.
pub async fn delete_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw): Path<String>,
) -> AppResult<StatusCode> {
    let tag_id = parse_id("tag_uuid", &raw)?;
    tag::delete(&state.pool, auth.user_id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Task links
// ---------------------------------------------------------------------------

/// GET /me/lists/{list_uuid}/tasks/{task_uuid}/tags
pub async fn task_tags(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
) -> AppResult<Json<Vec<Tag>>> {
    let at = task_path(auth, &list, &task)?;
    Ok(Json(tag::for_task(&state.pool, at).await?))
}

/// PUT /me/lists/{list_uuid}/tasks/{task_uuid}/tags/{tag_uuid}
///
/// Idempotent.
pub async fn link_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task, tag)): Path<(String, String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    let tag_id = parse_id("tag_uuid", &tag)?;
    tag::link(&state.pool, at, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /me/lists/{list_uuid}/tasks/{task_uuid}/tags/{tag_uuid}
pub async fn unlink_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task, tag)): Path<(String, String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    let tag_id = parse_id("tag_uuid", &tag)?;
    tag::unlink(&state.pool, at, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

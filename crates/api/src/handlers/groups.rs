//! Handlers for `/me/groups`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use noda_core::error::CoreError;
use noda_core::ids::parse_id;
use noda_core::types::DbId;
use noda_db::models::group::Group;
use serde::Serialize;

use super::location;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{updated, Collection, Created};
use crate::services::group::{self, GroupPatch, NewGroup};
use crate::services::ensure_user;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GroupCreated {
    pub group_id: DbId,
}

/// POST /me/groups
pub async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewGroup>,
) -> AppResult<Created<GroupCreated>> {
    let group = group::create(&state.pool, auth.user_id, input).await?;
    Ok(Created(GroupCreated { group_id: group.id }))
}

/// GET /me/groups
pub async fn list_groups(
    State(state): State<AppState>,
    auth: AuthUser,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<Group>>> {
    let groups = group::list(&state.pool, auth.user_id, &params).await?;
    Ok(Json(Collection::new(params.pagination, groups)))
}

/// GET /me/groups/{group_uuid}
pub async fn get_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw): Path<String>,
) -> AppResult<Json<Group>> {
    let group_id = parse_id("group_uuid", &raw)?;
    Ok(Json(group::get(&state.pool, auth.user_id, group_id).await?))
}

/// PATCH /me/groups/{group_uuid}
pub async fn update_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw): Path<String>,
    JsonBody(input): JsonBody<GroupPatch>,
) -> AppResult<Response> {
    let group_id = parse_id("group_uuid", &raw)?;
    let outcome = group::update(&state.pool, auth.user_id, group_id, input).await?;
    Ok(updated(outcome, location::group(group_id)))
}

/// DELETE /me/groups/{group_uuid}
///
/// Deletes the group's lists and their tasks with it.
pub async fn delete_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw): Path<String>,
) -> AppResult<StatusCode> {
    let group_id = parse_id("group_uuid", &raw)?;
    if !group::remove(&state.pool, auth.user_id, group_id).await? {
        ensure_user(&state.pool, auth.user_id).await?;
        return Err(CoreError::GroupNotFound.into());
    }
    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for lists.
//!
//! Scattered lists live under `/me/lists`, grouped ones under
//! `/me/groups/{group_uuid}/lists`. Both families share the private
//! helpers at the bottom of this file; the only difference is whether the
//! lookup is constrained to a group.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use noda_core::ids::parse_id;
use noda_core::lists::ListKind;
use noda_core::types::DbId;
use noda_db::models::list::{List, ListFilter};
use serde::Serialize;

use super::location;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::query::{AllParams, ListParams};
use crate::response::{updated, Collection, Created};
use crate::services::list::{self, ListPatch, MoveList, NewList};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListCreated {
    pub list_id: DbId,
}

// ---------------------------------------------------------------------------
// Scattered lists
// ---------------------------------------------------------------------------

/// GET /me/lists
///
/// Scattered lists only, unless `?all=true` asks for every list.
pub async fn list_lists(
    State(state): State<AppState>,
    auth: AuthUser,
    AllParams { all }: AllParams,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<List>>> {
    let filter = if all {
        ListFilter::All
    } else {
        ListFilter::Scattered
    };
    let lists = list::list(&state.pool, auth.user_id, filter, &params).await?;
    Ok(Json(Collection::new(params.pagination, lists)))
}

/// POST /me/lists
pub async fn create_list(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<NewList>,
) -> AppResult<Created<ListCreated>> {
    create(&state, auth, None, input).await
}

/// GET /me/lists/{list_uuid}
pub async fn get_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(list): Path<String>,
) -> AppResult<Json<List>> {
    get(&state, auth, None, &list).await
}

/// PATCH /me/lists/{list_uuid}
pub async fn update_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(list): Path<String>,
    JsonBody(input): JsonBody<ListPatch>,
) -> AppResult<Response> {
    update(&state, auth, None, &list, input).await
}

/// DELETE /me/lists/{list_uuid}
pub async fn delete_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(list): Path<String>,
) -> AppResult<StatusCode> {
    delete(&state, auth, None, &list).await
}

/// POST /me/lists/{list_uuid}/duplicate
pub async fn duplicate_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(list): Path<String>,
) -> AppResult<Created<ListCreated>> {
    duplicate(&state, auth, None, &list).await
}

/// POST /me/lists/{list_uuid}/move
pub async fn move_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(list): Path<String>,
    JsonBody(input): JsonBody<MoveList>,
) -> AppResult<StatusCode> {
    move_to_group(&state, auth, None, &list, input).await
}

// ---------------------------------------------------------------------------
// Grouped lists
// ---------------------------------------------------------------------------

/// GET /me/groups/{group_uuid}/lists
pub async fn list_group_lists(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group): Path<String>,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<List>>> {
    let group_id = parse_id("group_uuid", &group)?;
    let filter = ListFilter::InGroup(group_id);
    let lists = list::list(&state.pool, auth.user_id, filter, &params).await?;
    Ok(Json(Collection::new(params.pagination, lists)))
}

/// POST /me/groups/{group_uuid}/lists
pub async fn create_group_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group): Path<String>,
    JsonBody(input): JsonBody<NewList>,
) -> AppResult<Created<ListCreated>> {
    let group_id = parse_id("group_uuid", &group)?;
    create(&state, auth, Some(group_id), input).await
}

/// GET /me/groups/{group_uuid}/lists/{list_uuid}
pub async fn get_group_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group, list)): Path<(String, String)>,
) -> AppResult<Json<List>> {
    let group_id = parse_id("group_uuid", &group)?;
    get(&state, auth, Some(group_id), &list).await
}

/// PATCH /me/groups/{group_uuid}/lists/{list_uuid}
pub async fn update_group_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group, list)): Path<(String, String)>,
    JsonBody(input): JsonBody<ListPatch>,
) -> AppResult<Response> {
    let group_id = parse_id("group_uuid", &group)?;
    update(&state, auth, Some(group_id), &list, input).await
}

/// DELETE /me/groups/{group_uuid}/lists/{list_uuid}
pub async fn delete_group_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group, list)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let group_id = parse_id("group_uuid", &group)?;
    delete(&state, auth, Some(group_id), &list).await
}

/// POST /me/groups/{group_uuid}/lists/{list_uuid}/duplicate
pub async fn duplicate_group_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group, list)): Path<(String, String)>,
) -> AppResult<Created<ListCreated>> {
    let group_id = parse_id("group_uuid", &group)?;
    duplicate(&state, auth, Some(group_id), &list).await
}

/// POST /me/groups/{group_uuid}/lists/{list_uuid}/move
pub async fn move_group_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group, list)): Path<(String, String)>,
    JsonBody(input): JsonBody<MoveList>,
) -> AppResult<StatusCode> {
    let group_id = parse_id("group_uuid", &group)?;
    move_to_group(&state, auth, Some(group_id), &list, input).await
}

/// POST /me/groups/{group_uuid}/lists/{list_uuid}/scatter
pub async fn scatter_list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((group, list)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let group_id = parse_id("group_uuid", &group)?;
    let list_id = parse_id("list_uuid", &list)?;
    list::scatter(&state.pool, auth.user_id, group_id, list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Reserved lists
// ---------------------------------------------------------------------------

/// GET /me/today
pub async fn today_list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<List>> {
    reserved(&state, auth, ListKind::Today).await
}

/// GET /me/tomorrow
pub async fn tomorrow_list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<List>> {
    reserved(&state, auth, ListKind::Tomorrow).await
}

/// GET /me/deferred
pub async fn deferred_list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<List>> {
    reserved(&state, auth, ListKind::Deferred).await
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

async fn create(
    state: &AppState,
    auth: AuthUser,
    group_id: Option<DbId>,
    input: NewList,
) -> AppResult<Created<ListCreated>> {
    let list = list::create(&state.pool, auth.user_id, group_id, input).await?;
    Ok(Created(ListCreated { list_id: list.id }))
}

async fn get(
    state: &AppState,
    auth: AuthUser,
    group_id: Option<DbId>,
    raw: &str,
) -> AppResult<Json<List>> {
    let list_id = parse_id("list_uuid", raw)?;
    Ok(Json(list::get(&state.pool, auth.user_id, group_id, list_id).await?))
}

async fn update(
    state: &AppState,
    auth: AuthUser,
    group_id: Option<DbId>,
    raw: &str,
    input: ListPatch,
) -> AppResult<Response> {
    let list_id = parse_id("list_uuid", raw)?;
    let outcome = list::update(&state.pool, auth.user_id, group_id, list_id, input).await?;
    Ok(updated(outcome, location::list(group_id, list_id)))
}

async fn delete(
    state: &AppState,
    auth: AuthUser,
    group_id: Option<DbId>,
    raw: &str,
) -> AppResult<StatusCode> {
    let list_id = parse_id("list_uuid", raw)?;
    list::delete(&state.pool, auth.user_id, group_id, list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn duplicate(
    state: &AppState,
    auth: AuthUser,
    group_id: Option<DbId>,
    raw: &str,
) -> AppResult<Created<ListCreated>> {
    let list_id = parse_id("list_uuid", raw)?;
    let replica = list::duplicate(&state.pool, auth.user_id, group_id, list_id).await?;
    Ok(Created(ListCreated { list_id: replica.id }))
}

async fn move_to_group(
    state: &AppState,
    auth: AuthUser,
    group_id: Option<DbId>,
    raw: &str,
    input: MoveList,
) -> AppResult<StatusCode> {
    let list_id = parse_id("list_uuid", raw)?;
    let target = parse_id("group_id", input.group_id.trim())?;
    list::move_to_group(&state.pool, auth.user_id, group_id, list_id, target).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reserved(state: &AppState, auth: AuthUser, kind: ListKind) -> AppResult<Json<List>> {
    Ok(Json(list::reserved(&state.pool, auth.user_id, kind).await?))
}

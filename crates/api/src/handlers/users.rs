//! Handlers for the admin surface under `/users`.
//!
//! Every handler takes [`RequireAdmin`]; the router also layers the same
//! check so unknown sub-paths never reach a handler unauthenticated.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use noda_core::ids::parse_id;
use noda_core::query::CollectionQuery;
use noda_db::models::user::{User, UserFilter, UserResponse};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::Collection;
use crate::services::user;
use crate::state::AppState;

fn page(params: &CollectionQuery, users: Vec<User>) -> Collection<UserResponse> {
    let payload = users.into_iter().map(UserResponse::from).collect();
    Collection::new(params.pagination, payload)
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<UserResponse>>> {
    let users = user::list(&state.pool, UserFilter::Active, &params).await?;
    Ok(Json(page(&params, users)))
}

/// GET /users/search
///
/// Same as `GET /users` but `search` must be given.
pub async fn search_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<UserResponse>>> {
    let users = user::search(&state.pool, &params).await?;
    Ok(Json(page(&params, users)))
}

/// GET /users/blocked
pub async fn blocked_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<UserResponse>>> {
    let users = user::list(&state.pool, UserFilter::Blocked, &params).await?;
    Ok(Json(page(&params, users)))
}

/// GET /users/{user_uuid}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(raw): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user_id = parse_id("user_uuid", &raw)?;
    Ok(Json(user::find(&state.pool, user_id).await?.into()))
}

/// DELETE /users/{user_uuid}
///
/// Hard delete; everything the user owns goes with it.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw): Path<String>,
) -> AppResult<StatusCode> {
    let user_id = parse_id("user_uuid", &raw)?;
    user::remove(&state.pool, admin.user_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /users/{user_uuid}/block
pub async fn block_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw): Path<String>,
) -> AppResult<StatusCode> {
    let user_id = parse_id("user_uuid", &raw)?;
    user::set_blocked(&state.pool, admin.user_id, user_id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/{user_uuid}/block
pub async fn unblock_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw): Path<String>,
) -> AppResult<StatusCode> {
    let user_id = parse_id("user_uuid", &raw)?;
    user::set_blocked(&state.pool, admin.user_id, user_id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /users/{user_uuid}/make_admin
pub async fn grant_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw): Path<String>,
) -> AppResult<StatusCode> {
    let user_id = parse_id("user_uuid", &raw)?;
    user::set_admin(&state.pool, admin.user_id, user_id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/{user_uuid}/make_admin
pub async fn revoke_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw): Path<String>,
) -> AppResult<StatusCode> {
    let user_id = parse_id("user_uuid", &raw)?;
    user::set_admin(&state.pool, admin.user_id, user_id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for the caller's own account under `/me`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use noda_db::models::user::UserResponse;

use super::location;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::response::updated;
use crate::services::user::{self, PasswordChange, ProfilePatch};
use crate::state::AppState;

/// GET /me
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let me = user::me(&state.pool, auth.user_id).await?;
    Ok(Json(me.into()))
}

/// PATCH /me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<ProfilePatch>,
) -> AppResult<Response> {
    let outcome = user::update_profile(&state.pool, auth.user_id, input).await?;
    Ok(updated(outcome, location::me()))
}

/// PUT /me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(input): JsonBody<PasswordChange>,
) -> AppResult<StatusCode> {
    user::change_password(&state.pool, auth.user_id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /me
pub async fn delete_me(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    user::delete_me(&state.pool, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Route definitions for the admin surface.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users` (admin only).
///
/// ```text
/// GET    /                          -> list_users
/// GET    /search                    -> search_users
/// GET    /blocked                   -> blocked_users
/// GET    /{user_uuid}               -> get_user
/// DELETE /{user_uuid}               -> delete_user
/// PUT    /{user_uuid}/block         -> block_user
/// DELETE /{user_uuid}/block         -> unblock_user
/// PUT    /{user_uuid}/make_admin    -> grant_admin
/// DELETE /{user_uuid}/make_admin    -> revoke_admin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/search", get(users::search_users))
        .route("/blocked", get(users::blocked_users))
        .route(
            "/{user_uuid}",
            get(users::get_user).delete(users::delete_user),
        )
        .route(
            "/{user_uuid}/block",
            put(users::block_user).delete(users::unblock_user),
        )
        .route(
            "/{user_uuid}/make_admin",
            put(users::grant_admin).delete(users::revoke_admin),
        )
}

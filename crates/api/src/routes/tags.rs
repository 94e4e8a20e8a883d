//! Route definitions for tags.
//!
//! Two routers are provided:
//! - `router()` for tag CRUD mounted at `/me/tags`
//! - `task_tags_router()` for task links mounted at `/me/lists`

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/me/tags`.
///
/// ```text
/// GET    /             -> list_tags
/// POST   /             -> create_tag
/// GET    /{tag_uuid}   -> get_tag
/// PATCH  /{tag_uuid}   -> update_tag
/// DELETE /{tag_uuid}   -> delete_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags).post(tags::create_tag))
        .route(
            "/{tag_uuid}",
            get(tags::get_tag)
                .patch(tags::update_tag)
                .delete(tags::delete_tag),
        )
}

/// Task-scoped tag routes mounted at `/me/lists`.
///
/// ```text
/// GET    /{list_uuid}/tasks/{task_uuid}/tags              -> task_tags
/// PUT    /{list_uuid}/tasks/{task_uuid}/tags/{tag_uuid}   -> link_tag
/// DELETE /{list_uuid}/tasks/{task_uuid}/tags/{tag_uuid}   -> unlink_tag
/// ```
pub fn task_tags_router() -> Router<AppState> {
    Router::new()
        .route("/{list_uuid}/tasks/{task_uuid}/tags", get(tags::task_tags))
        .route(
            "/{list_uuid}/tasks/{task_uuid}/tags/{tag_uuid}",
            put(tags::link_tag).delete(tags::unlink_tag),
        )
}

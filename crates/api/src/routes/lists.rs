//! Route definitions for scattered lists.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::lists;
use crate::state::AppState;

/// Routes mounted at `/me/lists`.
///
/// ```text
/// GET    /                        -> list_lists (?all=true for every list)
/// POST   /                        -> create_list
/// GET    /{list_uuid}             -> get_list
/// PATCH  /{list_uuid}             -> update_list
/// DELETE /{list_uuid}             -> delete_list
/// POST   /{list_uuid}/duplicate   -> duplicate_list
/// POST   /{list_uuid}/move        -> move_list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lists::list_lists).post(lists::create_list))
        .route(
            "/{list_uuid}",
            get(lists::get_list)
                .patch(lists::update_list)
                .delete(lists::delete_list),
        )
        .route("/{list_uuid}/duplicate", post(lists::duplicate_list))
        .route("/{list_uuid}/move", post(lists::move_list))
}

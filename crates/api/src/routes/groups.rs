//! Route definitions for groups and the lists inside them.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{groups, lists};
use crate::state::AppState;

/// Routes mounted at `/me/groups`.
///
/// ```text
/// GET    /                                      -> list_groups
/// POST   /                                      -> create_group
/// GET    /{group_uuid}                          -> get_group
/// PATCH  /{group_uuid}                          -> update_group
/// DELETE /{group_uuid}                          -> delete_group
/// GET    /{group_uuid}/lists                    -> list_group_lists
/// POST   /{group_uuid}/lists                    -> create_group_list
/// GET    /{group_uuid}/lists/{list_uuid}        -> get_group_list
/// PATCH  /{group_uuid}/lists/{list_uuid}        -> update_group_list
/// DELETE /{group_uuid}/lists/{list_uuid}        -> delete_group_list
/// POST   /{group_uuid}/lists/{list_uuid}/duplicate -> duplicate_group_list
/// POST   /{group_uuid}/lists/{list_uuid}/move   -> move_group_list
/// POST   /{group_uuid}/lists/{list_uuid}/scatter -> scatter_list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(groups::list_groups).post(groups::create_group))
        .route(
            "/{group_uuid}",
            get(groups::get_group)
                .patch(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            "/{group_uuid}/lists",
            get(lists::list_group_lists).post(lists::create_group_list),
        )
        .route(
            "/{group_uuid}/lists/{list_uuid}",
            get(lists::get_group_list)
                .patch(lists::update_group_list)
                .delete(lists::delete_group_list),
        )
        .route(
            "/{group_uuid}/lists/{list_uuid}/duplicate",
            post(lists::duplicate_group_list),
        )
        .route(
            "/{group_uuid}/lists/{list_uuid}/move",
            post(lists::move_group_list),
        )
        .route(
            "/{group_uuid}/lists/{list_uuid}/scatter",
            post(lists::scatter_list),
        )
}

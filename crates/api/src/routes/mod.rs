pub mod auth;
pub mod groups;
pub mod health;
pub mod lists;
pub mod me;
pub mod tags;
pub mod tasks;
pub mod users;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;

use crate::middleware::auth::require_auth;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// Build the route tree.
///
/// Route hierarchy:
///
/// ```text
/// /signup, /login                          public
///
/// /me                                      profile, password, settings,
///                                          reserved lists (auth required)
/// /me/groups[/{g}[/lists[/{l}]]]           groups and grouped lists
/// /me/lists[/{l}]                          scattered lists
/// /me/lists/{l}/tasks[/{t}]                tasks, verbs, steps, tags,
///                                          attachments
/// /me/tasks                                cross-list task views
/// /me/tags[/{tag}]                         tag CRUD
///
/// /users[/{u}]                             admin surface (admin only)
/// ```
///
/// `require_auth` runs as a route layer so unmatched paths still fall
/// through to the router fallback. Admin routes add `require_admin`
/// inside the auth layer.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let me = Router::new()
        .merge(me::router())
        .nest("/groups", groups::router())
        .nest(
            "/lists",
            lists::router()
                .merge(tasks::list_router())
                .merge(tags::task_tags_router()),
        )
        .nest("/tasks", tasks::router())
        .nest("/tags", tags::router());

    let protected = Router::new()
        .nest("/me", me)
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .nest("/users", users::router())
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, require_auth));

    Router::new()
        .merge(auth::router())
        .merge(protected)
        .merge(admin)
}

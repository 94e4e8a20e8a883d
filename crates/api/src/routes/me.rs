//! Route definitions for the caller's own account.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{lists, me, settings};
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET    /                -> get_me
/// PATCH  /                -> update_me
/// DELETE /                -> delete_me
/// PUT    /password        -> change_password
/// GET    /settings        -> list_settings
/// GET    /settings/{key}  -> get_setting
/// PUT    /settings/{key}  -> put_setting
/// GET    /today           -> today_list
/// GET    /tomorrow        -> tomorrow_list
/// GET    /deferred        -> deferred_list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(me::get_me).patch(me::update_me).delete(me::delete_me),
        )
        .route("/password", put(me::change_password))
        .route("/settings", get(settings::list_settings))
        .route(
            "/settings/{key}",
            get(settings::get_setting).put(settings::put_setting),
        )
        .route("/today", get(lists::today_list))
        .route("/tomorrow", get(lists::tomorrow_list))
        .route("/deferred", get(lists::deferred_list))
}

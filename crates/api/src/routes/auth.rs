//! Public account routes.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at the root.
///
/// ```text
/// POST /signup  -> sign_up
/// POST /login   -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/login", post(auth::login))
}

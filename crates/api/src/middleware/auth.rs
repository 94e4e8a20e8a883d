//! Bearer-token authentication.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use noda_core::error::CoreError;
use noda_core::roles::Role;
use noda_core::types::DbId;

use crate::auth::jwt::{verify_token, Principal};
use crate::error::AppError;
use crate::services::ensure_user;
use crate::state::AppState;

/// The authenticated caller, stored in request extensions by [`require_auth`].
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
}

impl From<Principal> for AuthUser {
    fn from(principal: Principal) -> Self {
        Self {
            user_id: principal.user_id,
            role: principal.role,
        }
    }
}

/// The token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(CoreError::MissingAuthorization)
}

/// Reject the request unless it carries a valid bearer token whose user has
/// not been deleted since the token was issued.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;
    let principal = verify_token(token, &state.config.jwt)?;
    ensure_user(&state.pool, principal.user_id).await?;

    request.extensions_mut().insert(AuthUser::from(principal));
    Ok(next.run(request).await)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AppError::Core(CoreError::MissingAuthorization))
    }
}

//! Role-based access control.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use noda_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;

/// Requires the `admin` role.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     // admin is guaranteed to be an administrator here
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub AuthUser);

impl<S: Send + Sync> FromRequestParts<S> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_admin() {
            return Err(AppError::Core(CoreError::InsufficientRights));
        }
        Ok(RequireAdmin(user))
    }
}

/// Layer form of [`RequireAdmin`], composed inside `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();
    let RequireAdmin(admin) = RequireAdmin::from_request_parts(&mut parts, &()).await?;
    tracing::debug!(user_id = %admin.user_id, "Admin access granted");
    Ok(next.run(Request::from_parts(parts, body)).await)
}

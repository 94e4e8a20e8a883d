use axum::body::HttpBody;
use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;
use noda_core::error::CoreError;

use crate::error::AppError;

/// Reject POST, PUT and PATCH bodies that are not declared as JSON.
///
/// Requests without a body pass, so verbs like `POST .../complete` need no
/// content type.
pub async fn require_json(request: Request, next: Next) -> Result<Response, AppError> {
    if carries_body(&request) && !is_json(request.headers()) {
        return Err(AppError::Core(CoreError::UnsupportedMediaType));
    }
    Ok(next.run(request).await)
}

fn carries_body(request: &Request) -> bool {
    matches!(*request.method(), Method::POST | Method::PUT | Method::PATCH)
        && request.body().size_hint().upper() != Some(0)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

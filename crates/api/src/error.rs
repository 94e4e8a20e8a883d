use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use noda_core::error::CoreError;
use noda_db::DbError;
use serde::Serialize;

/// Challenge sent with 401 responses caused by a missing or invalid token.
pub const BEARER_CHALLENGE: &str = r#"Bearer realm="noda""#;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and renders it as the `{error_code, message,
/// details?, hint?}` envelope with the status the error carries.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `noda_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A domain error whose message and hint were rewritten for the caller.
    #[error("{message}")]
    Refined {
        error: CoreError,
        message: String,
        hint: Option<String>,
    },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Keep the code and status of `error` but replace message and hint.
    pub fn refined(error: CoreError, message: impl Into<String>, hint: Option<&str>) -> Self {
        AppError::Refined {
            error,
            message: message.into(),
            hint: hint.map(str::to_string),
        }
    }

    /// The underlying domain error.
    pub fn core(&self) -> &CoreError {
        match self {
            AppError::Core(error) | AppError::Refined { error, .. } => error,
        }
    }
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        AppError::Core(err.into())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Core(CoreError::BadQueryParameter {
            parameter: "query".to_string(),
            reason: rejection.body_text(),
        })
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Path rejected");
        AppError::Core(CoreError::TargetNotFound)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error_code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (error, message, hint) = match self {
            AppError::Core(error) => {
                let message = error.message();
                let hint = error.hint();
                (error, message, hint)
            }
            AppError::Refined {
                error,
                message,
                hint,
            } => (error, message, hint),
        };

        if let CoreError::Internal(detail) = &error {
            tracing::error!(error = %detail, "Internal error");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }

        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error_code: error.code(),
            message,
            details: error.details(),
            hint,
        };

        let mut response = (status, axum::Json(body)).into_response();
        if error.is_auth_challenge() {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(BEARER_CHALLENGE));
        }
        response
    }
}

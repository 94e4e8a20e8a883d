//! Answers for requests that match no route.

use noda_core::error::CoreError;

use crate::error::AppError;

/// Router fallback: nothing is mounted at this path.
pub async fn not_found() -> AppError {
    AppError::Core(CoreError::TargetNotFound)
}

/// The path exists but not for this method.
pub async fn method_not_allowed() -> AppError {
    AppError::Core(CoreError::MethodNotAllowed)
}

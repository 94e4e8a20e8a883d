//! Handlers for account creation and sign-in.

use axum::extract::State;
use axum::Json;
use noda_core::error::CoreError;
use noda_core::types::DbId;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::response::Created;
use crate::services::auth::{self, SignIn, SignUp};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub user_id: DbId,
}

/// Successful sign-in.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The signed-in user's id.
    pub id: DbId,
    pub token: String,
    pub subject: String,
    pub issuer: String,
    /// Unix timestamp.
    pub issued_at: i64,
    pub expires: Expiry,
}

#[derive(Debug, Serialize)]
pub struct Expiry {
    /// Unix timestamp.
    pub at: i64,
    /// Seconds between issue and expiry.
    pub within: i64,
    pub unit: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /signup
pub async fn sign_up(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SignUp>,
) -> AppResult<Created<SignUpResponse>> {
    let user_id = auth::sign_up(&state.pool, input).await?;
    Ok(Created(SignUpResponse { user_id }))
}

/// POST /login
///
/// An unknown email is reported by name with a pointer to sign-up.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SignIn>,
) -> AppResult<Json<LoginResponse>> {
    let email = input.email.trim().to_string();
    let session = auth::sign_in(&state.pool, &state.config.jwt, input)
        .await
        .map_err(|err| match err {
            CoreError::UserNotFound => AppError::refined(
                err,
                format!("No account is registered with the email address \"{email}\"."),
                Some("Try creating an account first."),
            ),
            other => AppError::Core(other),
        })?;

    let claims = session.issued.claims;
    Ok(Json(LoginResponse {
        id: session.user_id,
        token: session.issued.token,
        subject: claims.sub,
        issuer: claims.iss,
        issued_at: claims.iat,
        expires: Expiry {
            at: claims.exp,
            within: claims.exp - claims.iat,
            unit: "s",
        },
    }))
}

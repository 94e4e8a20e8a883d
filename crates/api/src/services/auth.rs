//! Sign-up and sign-in.

use noda_core::credentials::{check_password_policy, check_password_size, is_valid_email};
use noda_core::error::CoreError;
use noda_core::limits::{EMAIL_MAX, USER_NAME_MAX};
use noda_core::text::{bounded, patch};
use noda_core::types::DbId;
use noda_db::models::user::CreateUser;
use noda_db::repositories::UserRepo;
use noda_db::DbPool;
use serde::Deserialize;

use crate::auth::jwt::{issue_token, IssuedToken, JwtConfig};
use crate::auth::password;

const CONTEXT: &str = "User";

/// Request body for `POST /signup`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignUp {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignIn {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A successful sign-in.
#[derive(Debug)]
pub struct Session {
    pub user_id: DbId,
    pub issued: IssuedToken,
}

/// Create an account together with its reserved lists and default settings.
pub async fn sign_up(pool: &DbPool, input: SignUp) -> Result<DbId, CoreError> {
    let first_name = bounded(CONTEXT, "first_name", &input.first_name, USER_NAME_MAX)?;
    let middle_name = patch(CONTEXT, "middle_name", input.middle_name.as_deref(), USER_NAME_MAX)?;
    let last_name = bounded(CONTEXT, "last_name", &input.last_name, USER_NAME_MAX)?;
    let surname = patch(CONTEXT, "surname", input.surname.as_deref(), USER_NAME_MAX)?;
    let email = bounded(CONTEXT, "email", &input.email, EMAIL_MAX)?;
    let password = input.password.trim();

    if first_name.is_empty() {
        return Err(CoreError::ValidationRequired {
            field: "first_name",
            context: CONTEXT,
        });
    }
    if last_name.is_empty() {
        return Err(CoreError::ValidationRequired {
            field: "last_name",
            context: CONTEXT,
        });
    }
    if !is_valid_email(&email) {
        return Err(CoreError::InvalidEmail);
    }

    check_password_policy(password, &email)?;
    check_password_size(password)?;
    let password_hash = password::hash(password.to_string()).await?;

    let user = UserRepo::create_with_defaults(
        pool,
        &CreateUser {
            first_name,
            middle_name,
            last_name,
            surname,
            email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User signed up");
    Ok(user.id)
}

/// Check credentials and issue a bearer token.
pub async fn sign_in(
    pool: &DbPool,
    jwt: &JwtConfig,
    input: SignIn,
) -> Result<Session, CoreError> {
    let email = bounded(CONTEXT, "email", &input.email, EMAIL_MAX)?;
    let password = input.password.trim();
    check_password_size(password)?;
    if !is_valid_email(&email) {
        return Err(CoreError::InvalidEmail);
    }

    let user = UserRepo::find_by_email(pool, &email)
        .await?
        .ok_or(CoreError::UserNotFound)?;

    if user.is_blocked {
        tracing::info!(user_id = %user.id, "Sign-in refused for blocked user");
        return Err(CoreError::UserBlocked);
    }

    if !password::verify(password.to_string(), user.password_hash).await? {
        return Err(CoreError::IncorrectPassword);
    }

    let issued = issue_token(user.id, user.role, jwt)
        .map_err(|e| CoreError::Internal(format!("Token signing failed: {e}")))?;

    tracing::info!(user_id = %user.id, "User signed in");
    Ok(Session {
        user_id: user.id,
        issued,
    })
}

//! Self-service profile operations and the admin user surface.

use noda_core::credentials::{check_password_policy, check_password_size};
use noda_core::error::CoreError;
use noda_core::limits::{PICTURE_URL_MAX, USER_NAME_MAX};
use noda_core::query::CollectionQuery;
use noda_core::roles::Role;
use noda_core::text::patch;
use noda_core::types::DbId;
use noda_db::models::user::{UpdateUser, User, UserFilter};
use noda_db::repositories::UserRepo;
use noda_db::DbPool;
use serde::Deserialize;

use super::Update;
use crate::auth::password;

const CONTEXT: &str = "User";

/// Request body for `PATCH /me`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub surname: Option<String>,
    pub picture_url: Option<String>,
}

/// Request body for `PUT /me/password`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PasswordChange {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Self service
// ---------------------------------------------------------------------------

pub async fn me(pool: &DbPool, user_id: DbId) -> Result<User, CoreError> {
    UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(CoreError::UserNoLongerExists)
}

pub async fn update_profile(
    pool: &DbPool,
    user_id: DbId,
    input: ProfilePatch,
) -> Result<Update, CoreError> {
    let changes = UpdateUser {
        first_name: patch(CONTEXT, "first_name", input.first_name.as_deref(), USER_NAME_MAX)?,
        middle_name: patch(CONTEXT, "middle_name", input.middle_name.as_deref(), USER_NAME_MAX)?,
        last_name: patch(CONTEXT, "last_name", input.last_name.as_deref(), USER_NAME_MAX)?,
        surname: patch(CONTEXT, "surname", input.surname.as_deref(), USER_NAME_MAX)?,
        picture_url: patch(CONTEXT, "picture_url", input.picture_url.as_deref(), PICTURE_URL_MAX)?,
    };
    if changes.is_empty() {
        return Ok(Update::Nothing);
    }

    UserRepo::update(pool, user_id, &changes)
        .await?
        .ok_or(CoreError::UserNoLongerExists)?;
    Ok(Update::Applied)
}

pub async fn change_password(
    pool: &DbPool,
    user_id: DbId,
    input: PasswordChange,
) -> Result<(), CoreError> {
    let user = me(pool, user_id).await?;

    let old_password = input.old_password.trim();
    check_password_size(old_password)?;
    if !password::verify(old_password.to_string(), user.password_hash).await? {
        return Err(CoreError::IncorrectPassword);
    }

    let new_password = input.new_password.trim();
    check_password_policy(new_password, &user.email)?;
    check_password_size(new_password)?;
    let hash = password::hash(new_password.to_string()).await?;

    if !UserRepo::set_password_hash(pool, user_id, &hash).await? {
        return Err(CoreError::UserNoLongerExists);
    }
    tracing::info!(user_id = %user_id, "Password changed");
    Ok(())
}

/// Soft-delete the caller's account.
pub async fn delete_me(pool: &DbPool, user_id: DbId) -> Result<(), CoreError> {
    if !UserRepo::soft_delete(pool, user_id).await? {
        return Err(CoreError::UserNoLongerExists);
    }
    tracing::info!(user_id = %user_id, "Account deleted by its owner");
    Ok(())
}

// ---------------------------------------------------------------------------
// Admin surface
// ---------------------------------------------------------------------------

pub async fn list(
    pool: &DbPool,
    filter: UserFilter,
    params: &CollectionQuery,
) -> Result<Vec<User>, CoreError> {
    Ok(UserRepo::list(pool, filter, params).await?)
}

/// Like [`list`] but a search term is mandatory.
pub async fn search(pool: &DbPool, params: &CollectionQuery) -> Result<Vec<User>, CoreError> {
    if params.search.is_none() {
        return Err(CoreError::BadRequest(
            "The search query parameter must not be blank.".to_string(),
        ));
    }
    list(pool, UserFilter::Active, params).await
}

pub async fn find(pool: &DbPool, user_id: DbId) -> Result<User, CoreError> {
    UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(CoreError::UserNotFound)
}

/// Administrators cannot block, delete or demote themselves.
fn guard_self(admin_id: DbId, target_id: DbId) -> Result<(), CoreError> {
    if admin_id == target_id {
        return Err(CoreError::SelfOperation);
    }
    Ok(())
}

/// Purge a user and everything it owns.
pub async fn remove(pool: &DbPool, admin_id: DbId, target_id: DbId) -> Result<(), CoreError> {
    guard_self(admin_id, target_id)?;
    if !UserRepo::hard_delete(pool, target_id).await? {
        return Err(CoreError::UserNotFound);
    }
    tracing::info!(admin_id = %admin_id, user_id = %target_id, "User purged");
    Ok(())
}

pub async fn set_blocked(
    pool: &DbPool,
    admin_id: DbId,
    target_id: DbId,
    blocked: bool,
) -> Result<(), CoreError> {
    guard_self(admin_id, target_id)?;
    if !UserRepo::set_blocked(pool, target_id, blocked).await? {
        return Err(CoreError::UserNotFound);
    }
    tracing::info!(admin_id = %admin_id, user_id = %target_id, blocked, "User block state changed");
    Ok(())
}

/// Grant or revoke the admin role.
pub async fn set_admin(
    pool: &DbPool,
    admin_id: DbId,
    target_id: DbId,
    grant: bool,
) -> Result<(), CoreError> {
    if !grant {
        guard_self(admin_id, target_id)?;
    }
    let role = if grant { Role::Admin } else { Role::Regular };
    if !UserRepo::set_role(pool, target_id, role).await? {
        return Err(CoreError::UserNotFound);
    }
    tracing::info!(admin_id = %admin_id, user_id = %target_id, role = %role, "User role changed");
    Ok(())
}

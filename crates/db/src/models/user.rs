//! User entity model and DTOs.

use noda_core::roles::Role;
use noda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    #[sqlx(rename = "role_id", try_from = "i16")]
    pub role: Role,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub picture_url: Option<String>,
    pub is_blocked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub role: Role,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub surname: Option<String>,
    pub email: String,
    pub picture_url: Option<String>,
    pub is_blocked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            first_name: user.first_name,
            middle_name: user.middle_name,
            last_name: user.last_name,
            surname: user.surname,
            email: user.email,
            picture_url: user.picture_url,
            is_blocked: user.is_blocked,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Validated sign-up data. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password_hash: String,
}

/// Profile fields a user may change. `None` retains the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub surname: Option<String>,
    pub picture_url: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.middle_name.is_none()
            && self.last_name.is_none()
            && self.surname.is_none()
            && self.picture_url.is_none()
    }
}

/// Which users an admin listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFilter {
    Active,
    Blocked,
}

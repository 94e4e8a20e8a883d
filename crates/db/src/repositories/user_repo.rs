//! Repository for the `users` table.

use noda_core::lists::RESERVED_KINDS;
use noda_core::query::CollectionQuery;
use noda_core::roles::Role;
use noda_core::text::like_pattern;
use noda_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User, UserFilter};
use crate::{deadline, DbError};

/// Column list for `users` queries.
const COLUMNS: &str = "\
    id, role_id, first_name, middle_name, last_name, surname, email, \
    password_hash, picture_url, is_blocked, created_at, updated_at, deleted_at";

/// Columns an admin may sort users by.
pub const SORTABLE: &[&str] = &[
    "first_name",
    "last_name",
    "surname",
    "email",
    "created_at",
    "updated_at",
];

const DEFAULT_ORDER: &str = "created_at ASC, id ASC";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user together with the three reserved lists and one setting
    /// row per predefined key, in a single transaction.
    pub async fn create_with_defaults(pool: &PgPool, input: &CreateUser) -> Result<User, DbError> {
        let kinds: Vec<&str> = RESERVED_KINDS.iter().map(|k| k.as_str()).collect();
        let names: Vec<&str> = RESERVED_KINDS.iter().map(|k| k.default_name()).collect();

        deadline(async {
            let mut tx = pool.begin().await?;

            let query = format!(
                "INSERT INTO users \
                     (first_name, middle_name, last_name, surname, email, password_hash) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING {COLUMNS}"
            );
            let user = sqlx::query_as::<_, User>(&query)
                .bind(&input.first_name)
                .bind(&input.middle_name)
                .bind(&input.last_name)
                .bind(&input.surname)
                .bind(&input.email)
                .bind(&input.password_hash)
                .fetch_one(&mut *tx)
                .await?;

            sqlx::query(
                "INSERT INTO lists (owner_id, name, kind) \
                 SELECT $1, r.name, r.kind \
                 FROM UNNEST($2::text[], $3::text[]) AS r(kind, name)",
            )
            .bind(user.id)
            .bind(&kinds)
            .bind(&names)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO user_settings (user_id, key, value) \
                 SELECT $1, key, default_value FROM predefined_settings",
            )
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(user)
        })
        .await
    }

    /// Find a user that has not been soft-deleted.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        deadline(
            sqlx::query_as::<_, User>(&query)
                .bind(id)
                .fetch_optional(pool),
        )
        .await
    }

    /// Find the active user holding an email address.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DbError> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL");
        deadline(
            sqlx::query_as::<_, User>(&query)
                .bind(email)
                .fetch_optional(pool),
        )
        .await
    }

    /// Whether the id names a user that has not been soft-deleted.
    pub async fn is_active(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        deadline(
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM users WHERE id = $1 AND deleted_at IS NULL)",
            )
            .bind(id)
            .fetch_one(pool),
        )
        .await
    }

    /// Page through active users. `search` matches any name part or the email.
    pub async fn list(
        pool: &PgPool,
        filter: UserFilter,
        params: &CollectionQuery,
    ) -> Result<Vec<User>, DbError> {
        let blocked_clause = match filter {
            UserFilter::Active => "",
            UserFilter::Blocked => "AND is_blocked ",
        };
        let order = params.order_by(SORTABLE, DEFAULT_ORDER);
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE deleted_at IS NULL {blocked_clause}\
               AND ($1::text IS NULL \
                    OR concat_ws(' ', first_name, middle_name, last_name, surname, email) \
                       ILIKE $1) \
             ORDER BY {order} \
             LIMIT $2 OFFSET $3"
        );
        let pattern = params.search.as_deref().map(like_pattern);
        deadline(
            sqlx::query_as::<_, User>(&query)
                .bind(pattern)
                .bind(params.pagination.limit())
                .bind(params.pagination.offset())
                .fetch_all(pool),
        )
        .await
    }

    /// Update profile fields. Returns `None` if the user is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, DbError> {
        let query = format!(
            "UPDATE users SET \
                 first_name = COALESCE($2, first_name), \
                 middle_name = COALESCE($3, middle_name), \
                 last_name = COALESCE($4, last_name), \
                 surname = COALESCE($5, surname), \
                 picture_url = COALESCE($6, picture_url) \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        deadline(
            sqlx::query_as::<_, User>(&query)
                .bind(id)
                .bind(&input.first_name)
                .bind(&input.middle_name)
                .bind(&input.last_name)
                .bind(&input.surname)
                .bind(&input.picture_url)
                .fetch_optional(pool),
        )
        .await
    }

    /// Replace the stored password hash.
    pub async fn set_password_hash(pool: &PgPool, id: DbId, hash: &str) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query(
                "UPDATE users SET password_hash = $2 WHERE id = $1 AND deleted_at IS NULL",
            )
            .bind(id)
            .bind(hash)
            .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_blocked(pool: &PgPool, id: DbId, blocked: bool) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query("UPDATE users SET is_blocked = $2 WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .bind(blocked)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_role(pool: &PgPool, id: DbId, role: Role) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query("UPDATE users SET role_id = $2 WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .bind(role.id())
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark the user deleted. Owned data is kept; the email becomes free.
    ///
    /// Returns `true` if an active user was marked.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Purge the user and, through cascading foreign keys, everything it owns.
    ///
    /// Soft-deleted users can still be purged.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        let result = deadline(
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

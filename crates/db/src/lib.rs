//! Persistence adapter over PostgreSQL.
//!
//! Every repository call runs under a fresh [`CALL_DEADLINE`] and returns a
//! [`DbError`]. Driver signals are translated into domain errors by the
//! `From<DbError> for CoreError` conversion at the bottom of this file.

use std::future::Future;
use std::time::Duration;

use noda_core::error::CoreError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Budget for a single repository call, transactions included.
pub const CALL_DEADLINE: Duration = Duration::from_secs(5);

/// PostgreSQL SQLSTATE codes the adapter recognises.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const QUERY_CANCELED: &str = "57014";

/// Errors surfaced by the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("database call exceeded its {0:?} deadline")]
    DeadlineExceeded(Duration),
}

/// Create a connection pool from parsed connection options.
pub async fn create_pool(options: PgConnectOptions) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(CALL_DEADLINE)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to prove the pool is usable.
pub async fn health_check(pool: &DbPool) -> Result<(), DbError> {
    deadline(async {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok::<_, sqlx::Error>(())
    })
    .await
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Run a database future under [`CALL_DEADLINE`].
///
/// On expiry the future is dropped, which aborts the in-flight query and
/// rolls back any open transaction.
pub async fn deadline<T, F>(fut: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(CALL_DEADLINE, fut).await {
        Ok(result) => result.map_err(DbError::from),
        Err(_) => {
            tracing::warn!(deadline = ?CALL_DEADLINE, "Database call timed out");
            Err(DbError::DeadlineExceeded(CALL_DEADLINE))
        }
    }
}

/// Map a violated constraint to the domain error it signals.
fn classify_constraint(code: &str, constraint: &str) -> Option<CoreError> {
    match (code, constraint) {
        (UNIQUE_VIOLATION, "uq_users_email") => Some(CoreError::DuplicateEmail),
        (UNIQUE_VIOLATION, "uq_tags_owner_name") => Some(CoreError::DuplicateTag),
        (FOREIGN_KEY_VIOLATION, "fk_lists_group") => Some(CoreError::GroupNotFound),
        (FOREIGN_KEY_VIOLATION, "fk_tasks_list") => Some(CoreError::ListNotFound),
        (FOREIGN_KEY_VIOLATION, "fk_user_settings_key") => Some(CoreError::SettingNotFound),
        (FOREIGN_KEY_VIOLATION, "fk_steps_task")
        | (FOREIGN_KEY_VIOLATION, "fk_attachments_task")
        | (FOREIGN_KEY_VIOLATION, "fk_task_tags_task") => Some(CoreError::TaskNotFound),
        (FOREIGN_KEY_VIOLATION, "fk_task_tags_tag") => Some(CoreError::TagNotFound),
        (FOREIGN_KEY_VIOLATION, c) if c.ends_with("_owner") => {
            Some(CoreError::UserNoLongerExists)
        }
        (CHECK_VIOLATION, "ck_tasks_schedule") => Some(CoreError::InvalidSchedule),
        _ => None,
    }
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DeadlineExceeded(_) => CoreError::DeadlineExceeded,
            DbError::Sqlx(sqlx::Error::RowNotFound) => CoreError::TargetNotFound,
            DbError::Sqlx(sqlx::Error::PoolTimedOut) => CoreError::DeadlineExceeded,
            DbError::Sqlx(sqlx::Error::Database(db_err)) => {
                let code = db_err.code().unwrap_or_default().to_string();
                if code == QUERY_CANCELED {
                    return CoreError::DeadlineExceeded;
                }
                let constraint = db_err.constraint().unwrap_or_default();
                classify_constraint(&code, constraint)
                    .unwrap_or_else(|| CoreError::Internal(db_err.to_string()))
            }
            DbError::Sqlx(other) => CoreError::Internal(other.to_string()),
        }
    }
}

//! Repository for the `user_settings` table.

use noda_core::query::CollectionQuery;
use noda_core::text::like_pattern;
use noda_core::types::DbId;
use sqlx::PgPool;

use crate::models::setting::UserSetting;
use crate::{deadline, DbError};

const COLUMNS: &str = "\
    s.key, s.value, p.description, s.created_at, s.updated_at";

pub const SORTABLE: &[&str] = &["key", "created_at", "updated_at"];

const DEFAULT_ORDER: &str = "key ASC";

pub struct SettingRepo;

impl SettingRepo {
    /// Page through a user's settings. `search` matches the key.
    pub async fn list(
        pool: &PgPool,
        user_id: DbId,
        params: &CollectionQuery,
    ) -> Result<Vec<UserSetting>, DbError> {
        let order = params.order_by_then(SORTABLE, DEFAULT_ORDER, "key");
        let query = format!(
            "SELECT {COLUMNS} \
             FROM user_settings s \
             JOIN predefined_settings p ON p.key = s.key \
             WHERE s.user_id = $1 AND ($2::text IS NULL OR s.key ILIKE $2) \
             ORDER BY {order} \
             LIMIT $3 OFFSET $4"
        );
        let pattern = params.search.as_deref().map(like_pattern);
        deadline(
            sqlx::query_as::<_, UserSetting>(&query)
                .bind(user_id)
                .bind(pattern)
                .bind(params.pagination.limit())
                .bind(params.pagination.offset())
                .fetch_all(pool),
        )
        .await
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        key: &str,
    ) -> Result<Option<UserSetting>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} \
             FROM user_settings s \
             JOIN predefined_settings p ON p.key = s.key \
             WHERE s.user_id = $1 AND s.key = $2"
        );
        deadline(
            sqlx::query_as::<_, UserSetting>(&query)
                .bind(user_id)
                .bind(key)
                .fetch_optional(pool),
        )
        .await
    }

    /// Store a value, creating the row if it was never provisioned.
    ///
    /// An unknown key violates `fk_user_settings_key`; a vanished user
    /// violates `fk_user_settings_owner`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DbError> {
        deadline(
            sqlx::query(
                "INSERT INTO user_settings (user_id, key, value) VALUES ($1, $2, $3) \
                 ON CONFLICT (user_id, key) DO UPDATE SET value = EXCLUDED.value",
            )
            .bind(user_id)
            .bind(key)
            .bind(value)
            .execute(pool),
        )
        .await?;
        Ok(())
    }
}

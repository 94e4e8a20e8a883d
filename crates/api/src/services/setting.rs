use noda_core::error::CoreError;
use noda_core::query::CollectionQuery;
use noda_core::settings::is_predefined;
use noda_core::types::DbId;
use noda_db::models::setting::UserSetting;
use noda_db::repositories::SettingRepo;
use noda_db::DbPool;
use serde::Deserialize;

use super::ensure_user;

/// Request body for `PUT /me/settings/{key}`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingValue {
    pub value: serde_json::Value,
}

pub async fn list(
    pool: &DbPool,
    user_id: DbId,
    params: &CollectionQuery,
) -> Result<Vec<UserSetting>, CoreError> {
    Ok(SettingRepo::list(pool, user_id, params).await?)
}

pub async fn get(pool: &DbPool, user_id: DbId, key: &str) -> Result<UserSetting, CoreError> {
    if !is_predefined(key) {
        return Err(CoreError::SettingNotFound);
    }
    if let Some(setting) = SettingRepo::find(pool, user_id, key).await? {
        return Ok(setting);
    }
    ensure_user(pool, user_id).await?;
    Err(CoreError::SettingNotFound)
}

/// Store a value for a predefined key. Values are free-form JSON.
pub async fn put(
    pool: &DbPool,
    user_id: DbId,
    key: &str,
    value: &serde_json::Value,
) -> Result<(), CoreError> {
    if !is_predefined(key) {
        return Err(CoreError::SettingNotFound);
    }
    SettingRepo::upsert(pool, user_id, key, value).await?;
    Ok(())
}

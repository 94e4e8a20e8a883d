//! Per-user setting rows.

use noda_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A `user_settings` row joined with its vocabulary description.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSetting {
    pub key: String,
    pub value: serde_json::Value,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

//! Group entity model and DTOs.

use noda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateGroup {
    pub name: String,
    pub description: String,
}

/// `None` retains the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateGroup {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

//! Step entity model and DTOs.

use noda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Step {
    pub id: DbId,
    pub task_id: DbId,
    pub position: i32,
    pub description: String,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStep {
    pub description: Option<String>,
    /// `Some(true)` stamps `completed_at`, `Some(false)` clears it.
    pub completed: Option<bool>,
}

impl UpdateStep {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.completed.is_none()
    }
}

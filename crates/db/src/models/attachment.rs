//! Attachment metadata model.

use noda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attachments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attachment {
    pub id: DbId,
    pub task_id: DbId,
    pub file_name: String,
    pub file_url: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateAttachment {
    pub file_name: String,
    pub file_url: String,
}

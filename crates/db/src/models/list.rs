//! List entity model and DTOs.

use noda_core::lists::ListKind;
use noda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `lists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct List {
    pub id: DbId,
    pub owner_id: DbId,
    /// `None` for scattered lists.
    pub group_id: Option<DbId>,
    pub name: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub kind: ListKind,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl List {
    pub fn is_scattered(&self) -> bool {
        self.group_id.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct CreateList {
    pub group_id: Option<DbId>,
    pub name: String,
    pub description: String,
}

/// `None` retains the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateList {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateList {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Which lists of an owner a collection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Scattered,
    InGroup(DbId),
}

use noda_core::error::CoreError;
use noda_core::limits::{GROUP_DESCRIPTION_MAX, GROUP_NAME_MAX};
use noda_core::query::CollectionQuery;
use noda_core::text::{bounded, patch, required};
use noda_core::types::DbId;
use noda_db::models::group::{CreateGroup, Group, UpdateGroup};
use noda_db::repositories::GroupRepo;
use noda_db::DbPool;
use serde::Deserialize;

use super::{resolve_group, Update};

const CONTEXT: &str = "Group";

/// Request body for `POST /me/groups`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for `PATCH /me/groups/{group_uuid}`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn create(pool: &DbPool, owner_id: DbId, input: NewGroup) -> Result<Group, CoreError> {
    let input = CreateGroup {
        name: required(CONTEXT, "name", &input.name, GROUP_NAME_MAX)?,
        description: bounded(CONTEXT, "description", &input.description, GROUP_DESCRIPTION_MAX)?,
    };
    let group = GroupRepo::create(pool, owner_id, &input).await?;
    tracing::debug!(user_id = %owner_id, group_id = %group.id, "Group created");
    Ok(group)
}

pub async fn get(pool: &DbPool, owner_id: DbId, id: DbId) -> Result<Group, CoreError> {
    resolve_group(pool, owner_id, id).await
}

pub async fn list(
    pool: &DbPool,
    owner_id: DbId,
    params: &CollectionQuery,
) -> Result<Vec<Group>, CoreError> {
    Ok(GroupRepo::list(pool, owner_id, params).await?)
}

pub async fn update(
    pool: &DbPool,
    owner_id: DbId,
    id: DbId,
    input: GroupPatch,
) -> Result<Update, CoreError> {
    let changes = UpdateGroup {
        name: patch(CONTEXT, "name", input.name.as_deref(), GROUP_NAME_MAX)?,
        description: patch(
            CONTEXT,
            "description",
            input.description.as_deref(),
            GROUP_DESCRIPTION_MAX,
        )?,
    };
    resolve_group(pool, owner_id, id).await?;
    if changes.is_empty() {
        return Ok(Update::Nothing);
    }

    GroupRepo::update(pool, owner_id, id, &changes)
        .await?
        .ok_or(CoreError::GroupNotFound)?;
    Ok(Update::Applied)
}

/// Delete a group with its lists and their tasks.
///
/// Returns whether a group was deleted.
pub async fn remove(pool: &DbPool, owner_id: DbId, id: DbId) -> Result<bool, CoreError> {
    let deleted = GroupRepo::delete(pool, owner_id, id).await?;
    if deleted {
        tracing::info!(user_id = %owner_id, group_id = %id, "Group deleted");
    }
    Ok(deleted)
}

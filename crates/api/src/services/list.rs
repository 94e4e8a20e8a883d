//! Lists, grouped and scattered, and the reserved lists.
//!
//! Reserved lists (`today`, `tomorrow`, `deferred`) are always scattered.
//! Their description may change but they are never renamed, moved,
//! scattered or deleted.

use noda_core::error::CoreError;
use noda_core::lists::{reserved_refusal, ListKind};
use noda_core::limits::{LIST_DESCRIPTION_MAX, LIST_NAME_MAX};
use noda_core::query::CollectionQuery;
use noda_core::text::{bounded, patch, required};
use noda_core::types::DbId;
use noda_db::models::list::{CreateList, List, ListFilter, UpdateList};
use noda_db::repositories::ListRepo;
use noda_db::DbPool;
use serde::Deserialize;

use super::{ensure_user, resolve_group, resolve_list, Update};

const CONTEXT: &str = "List";

/// Request body for creating a list.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewList {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Request body for `PATCH` on a list.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Request body for moving a list into a group.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveList {
    #[serde(default)]
    pub group_id: String,
}

fn refuse_reserved(list: &List, operation: &str) -> Result<(), CoreError> {
    if list.kind.is_reserved() {
        return Err(CoreError::BadRequest(reserved_refusal(list.kind, operation)));
    }
    Ok(())
}

/// Create a list inside `group_id`, or a scattered one.
pub async fn create(
    pool: &DbPool,
    owner_id: DbId,
    group_id: Option<DbId>,
    input: NewList,
) -> Result<List, CoreError> {
    let input = CreateList {
        group_id,
        name: required(CONTEXT, "name", &input.name, LIST_NAME_MAX)?,
        description: bounded(CONTEXT, "description", &input.description, LIST_DESCRIPTION_MAX)?,
    };
    if let Some(group_id) = group_id {
        resolve_group(pool, owner_id, group_id).await?;
    }
    let list = ListRepo::create(pool, owner_id, &input).await?;
    tracing::debug!(user_id = %owner_id, list_id = %list.id, "List created");
    Ok(list)
}

pub async fn get(
    pool: &DbPool,
    owner_id: DbId,
    group_id: Option<DbId>,
    id: DbId,
) -> Result<List, CoreError> {
    resolve_list(pool, owner_id, group_id, id).await
}

pub async fn list(
    pool: &DbPool,
    owner_id: DbId,
    filter: ListFilter,
    params: &CollectionQuery,
) -> Result<Vec<List>, CoreError> {
    if let ListFilter::InGroup(group_id) = filter {
        resolve_group(pool, owner_id, group_id).await?;
    }
    Ok(ListRepo::list(pool, owner_id, filter, params).await?)
}

/// One of the caller's reserved lists.
pub async fn reserved(pool: &DbPool, owner_id: DbId, kind: ListKind) -> Result<List, CoreError> {
    if let Some(list) = ListRepo::find_reserved(pool, owner_id, kind).await? {
        return Ok(list);
    }
    ensure_user(pool, owner_id).await?;
    Err(CoreError::ListNotFound)
}

pub async fn update(
    pool: &DbPool,
    owner_id: DbId,
    group_id: Option<DbId>,
    id: DbId,
    input: ListPatch,
) -> Result<Update, CoreError> {
    let changes = UpdateList {
        name: patch(CONTEXT, "name", input.name.as_deref(), LIST_NAME_MAX)?,
        description: patch(
            CONTEXT,
            "description",
            input.description.as_deref(),
            LIST_DESCRIPTION_MAX,
        )?,
    };
    let list = resolve_list(pool, owner_id, group_id, id).await?;
    if changes.name.is_some() {
        refuse_reserved(&list, "renamed")?;
    }
    if changes.is_empty() {
        return Ok(Update::Nothing);
    }

    ListRepo::update(pool, owner_id, id, &changes)
        .await?
        .ok_or(CoreError::ListNotFound)?;
    Ok(Update::Applied)
}

/// Deep-copy a list with its tasks, steps and tag links.
pub async fn duplicate(
    pool: &DbPool,
    owner_id: DbId,
    group_id: Option<DbId>,
    id: DbId,
) -> Result<List, CoreError> {
    resolve_list(pool, owner_id, group_id, id).await?;
    let replica = ListRepo::duplicate(pool, owner_id, id)
        .await?
        .ok_or(CoreError::ListNotFound)?;
    tracing::info!(user_id = %owner_id, source_id = %id, list_id = %replica.id, "List duplicated");
    Ok(replica)
}

/// Re-parent a list into another of the caller's groups.
pub async fn move_to_group(
    pool: &DbPool,
    owner_id: DbId,
    group_id: Option<DbId>,
    id: DbId,
    target_group_id: DbId,
) -> Result<(), CoreError> {
    let list = resolve_list(pool, owner_id, group_id, id).await?;
    refuse_reserved(&list, "moved")?;
    resolve_group(pool, owner_id, target_group_id).await?;

    if !ListRepo::set_group(pool, owner_id, id, Some(target_group_id)).await? {
        return Err(CoreError::ListNotFound);
    }
    Ok(())
}

/// Detach a grouped list from its group.
pub async fn scatter(
    pool: &DbPool,
    owner_id: DbId,
    group_id: DbId,
    id: DbId,
) -> Result<(), CoreError> {
    let list = resolve_list(pool, owner_id, Some(group_id), id).await?;
    refuse_reserved(&list, "scattered")?;

    if !ListRepo::set_group(pool, owner_id, id, None).await? {
        return Err(CoreError::ListNotFound);
    }
    Ok(())
}

pub async fn delete(
    pool: &DbPool,
    owner_id: DbId,
    group_id: Option<DbId>,
    id: DbId,
) -> Result<(), CoreError> {
    let list = resolve_list(pool, owner_id, group_id, id).await?;
    refuse_reserved(&list, "deleted")?;

    if !ListRepo::delete(pool, owner_id, id).await? {
        return Err(CoreError::ListNotFound);
    }
    tracing::info!(user_id = %owner_id, list_id = %id, "List deleted");
    Ok(())
}

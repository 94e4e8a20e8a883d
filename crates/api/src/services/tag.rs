//! Tags belong to a user and are linked to any number of that user's tasks.

use noda_core::error::CoreError;
use noda_core::limits::{TAG_COLOR_MAX, TAG_NAME_MAX};
use noda_core::query::CollectionQuery;
use noda_core::text::{patch, required};
use noda_core::types::DbId;
use noda_db::models::tag::{CreateTag, Tag, UpdateTag};
use noda_db::repositories::TagRepo;
use noda_db::DbPool;
use serde::Deserialize;

use super::{ensure_user, TaskPath, Update};

const CONTEXT: &str = "Tag";

/// Request body for `POST /me/tags`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Request body for `PATCH /me/tags/{tag_uuid}`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Normalize a color; when present it must look like `#1a2b3c`.
fn color(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    let color = patch(CONTEXT, "color", raw, TAG_COLOR_MAX)?;
    match color {
        Some(c) if !is_hex_color(&c) => Err(CoreError::BadRequest(
            "Tag color must be a hex color such as #1a2b3c.".to_string(),
        )),
        other => Ok(other),
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

async fn resolve_tag(pool: &DbPool, owner_id: DbId, id: DbId) -> Result<Tag, CoreError> {
    if let Some(tag) = TagRepo::find(pool, owner_id, id).await? {
        return Ok(tag);
    }
    ensure_user(pool, owner_id).await?;
    Err(CoreError::TagNotFound)
}

pub async fn create(pool: &DbPool, owner_id: DbId, input: NewTag) -> Result<Tag, CoreError> {
    let input = CreateTag {
        name: required(CONTEXT, "name", &input.name, TAG_NAME_MAX)?,
        color: color(input.color.as_deref())?,
    };
    Ok(TagRepo::create(pool, owner_id, &input).await?)
}

pub async fn get(pool: &DbPool, owner_id: DbId, id: DbId) -> Result<Tag, CoreError> {
    resolve_tag(pool, owner_id, id).await
}

pub async fn list(
    pool: &DbPool,
    owner_id: DbId,
    params: &CollectionQuery,
) -> Result<Vec<Tag>, CoreError> {
    Ok(TagRepo::list(pool, owner_id, params).await?)
}

pub async fn update(
    pool: &DbPool,
    owner_id: DbId,
    id: DbId,
    input: TagPatch,
) -> Result<Update, CoreError> {
    let changes = UpdateTag {
        name: patch(CONTEXT, "name", input.name.as_deref(), TAG_NAME_MAX)?,
        color: color(input.color.as_deref())?,
    };
    resolve_tag(pool, owner_id, id).await?;
    if changes.is_empty() {
        return Ok(Update::Nothing);
    }

    TagRepo::update(pool, owner_id, id, &changes)
        .await?
        .ok_or(CoreError::TagNotFound)?;
    Ok(Update::Applied)
}

pub async fn delete(pool: &DbPool, owner_id: DbId, id: DbId) -> Result<(), CoreError> {
    if !TagRepo::delete(pool, owner_id, id).await? {
        ensure_user(pool, owner_id).await?;
        return Err(CoreError::TagNotFound);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task links
// ---------------------------------------------------------------------------

pub async fn for_task(pool: &DbPool, at: TaskPath) -> Result<Vec<Tag>, CoreError> {
    let task = at.resolve(pool).await?;
    Ok(TagRepo::list_for_task(pool, task.id).await?)
}

/// Attach a tag to a task. Linking twice is a no-op.
pub async fn link(pool: &DbPool, at: TaskPath, tag_id: DbId) -> Result<(), CoreError> {
    let task = at.resolve(pool).await?;
    resolve_tag(pool, at.owner_id, tag_id).await?;
    TagRepo::link(pool, task.id, tag_id).await?;
    Ok(())
}

/// Detach a tag from a task. Unlinking an absent link is a no-op.
pub async fn unlink(pool: &DbPool, at: TaskPath, tag_id: DbId) -> Result<(), CoreError> {
    let task = at.resolve(pool).await?;
    resolve_tag(pool, at.owner_id, tag_id).await?;
    TagRepo::unlink(pool, task.id, tag_id).await?;
    Ok(())
}

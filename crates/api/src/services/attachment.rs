//! Attachment metadata. File contents live elsewhere; only a name and a URL
//! are stored.

use noda_core::error::CoreError;
use noda_core::limits::{ATTACHMENT_NAME_MAX, ATTACHMENT_URL_MAX};
use noda_core::query::CollectionQuery;
use noda_core::text::required;
use noda_core::types::DbId;
use noda_db::models::attachment::{Attachment, CreateAttachment};
use noda_db::repositories::AttachmentRepo;
use noda_db::DbPool;
use serde::Deserialize;

use super::TaskPath;

const CONTEXT: &str = "Attachment";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAttachment {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_url: String,
}

pub async fn list(
    pool: &DbPool,
    at: TaskPath,
    params: &CollectionQuery,
) -> Result<Vec<Attachment>, CoreError> {
    let task_id = at.resolve(pool).await?.id;
    Ok(AttachmentRepo::list(pool, task_id, params).await?)
}

pub async fn create(
    pool: &DbPool,
    at: TaskPath,
    input: NewAttachment,
) -> Result<Attachment, CoreError> {
    let input = CreateAttachment {
        file_name: required(CONTEXT, "file_name", &input.file_name, ATTACHMENT_NAME_MAX)?,
        file_url: required(CONTEXT, "file_url", &input.file_url, ATTACHMENT_URL_MAX)?,
    };
    let task_id = at.resolve(pool).await?.id;
    Ok(AttachmentRepo::create(pool, task_id, &input).await?)
}

pub async fn get(pool: &DbPool, at: TaskPath, id: DbId) -> Result<Attachment, CoreError> {
    let task_id = at.resolve(pool).await?.id;
    AttachmentRepo::find(pool, task_id, id)
        .await?
        .ok_or(CoreError::AttachmentNotFound)
}

pub async fn delete(pool: &DbPool, at: TaskPath, id: DbId) -> Result<(), CoreError> {
    let task_id = at.resolve(pool).await?.id;
    if !AttachmentRepo::delete(pool, task_id, id).await? {
        return Err(CoreError::AttachmentNotFound);
    }
    Ok(())
}

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use noda_core::ids::parse_id;
use noda_core::types::DbId;
use noda_db::models::attachment::Attachment;
use serde::Serialize;

use super::tasks::task_path;
use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::middleware::auth::AuthUser;
use crate::query::ListParams;
use crate::response::{Collection, Created};
use crate::services::attachment::{self, NewAttachment};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AttachmentCreated {
    pub attachment_id: DbId,
}

/// GET /me/lists/{list_uuid}/tasks/{task_uuid}/attachments
pub async fn list_attachments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
    ListParams(params): ListParams,
) -> AppResult<Json<Collection<Attachment>>> {
    let at = task_path(auth, &list, &task)?;
    let attachments = attachment::list(&state.pool, at, &params).await?;
    Ok(Json(Collection::new(params.pagination, attachments)))
}

/// POST /me/lists/{list_uuid}/tasks/{task_uuid}/attachments
pub async fn create_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task)): Path<(String, String)>,
    JsonBody(input): JsonBody<NewAttachment>,
) -> AppResult<Created<AttachmentCreated>> {
    let at = task_path(auth, &list, &task)?;
    let attachment = attachment::create(&state.pool, at, input).await?;
    Ok(Created(AttachmentCreated {
        attachment_id: attachment.id,
    }))
}

/// GET /me/lists/{list_uuid}/tasks/{task_uuid}/attachments/{attachment_uuid}
pub async fn get_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task, attachment)): Path<(String, String, String)>,
) -> AppResult<Json<Attachment>> {
    let at = task_path(auth, &list, &task)?;
    let attachment_id = parse_id("attachment_uuid", &attachment)?;
    Ok(Json(attachment::get(&state.pool, at, attachment_id).await?))
}

/// DELETE /me/lists/{list_uuid}/tasks/{task_uuid}/attachments/{attachment_uuid}
pub async fn delete_attachment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((list, task, attachment)): Path<(String, String, String)>,
) -> AppResult<StatusCode> {
    let at = task_path(auth, &list, &task)?;
    let attachment_id = parse_id("attachment_uuid", &attachment)?;
    attachment::delete(&state.pool, at, attachment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use noda_core::error::CoreError;
use noda_core::limits::STEP_DESCRIPTION_MAX;
use noda_core::query::CollectionQuery;
use noda_core::text::{patch, required};
use noda_core::types::DbId;
use noda_db::models::step::{Step, UpdateStep};
use noda_db::repositories::StepRepo;
use noda_db::DbPool;
use serde::Deserialize;

use super::{TaskPath, Update};

const CONTEXT: &str = "Step";

/// Request body for adding a step.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewStep {
    #[serde(default)]
    pub description: String,
}

/// Request body for `PATCH` on a step.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepPatch {
    pub description: Option<String>,
    pub completed: Option<bool>,
}

pub async fn list(
    pool: &DbPool,
    at: TaskPath,
    params: &CollectionQuery,
) -> Result<Vec<Step>, CoreError> {
    let task_id = at.resolve(pool).await?.id;
    Ok(StepRepo::list(pool, task_id, params).await?)
}

/// Append a step after the last one.
pub async fn create(pool: &DbPool, at: TaskPath, input: NewStep) -> Result<Step, CoreError> {
    let description = required(CONTEXT, "description", &input.description, STEP_DESCRIPTION_MAX)?;
    let task_id = at.resolve(pool).await?.id;
    StepRepo::create(pool, task_id, &description)
        .await?
        .ok_or(CoreError::TaskNotFound)
}

pub async fn get(pool: &DbPool, at: TaskPath, id: DbId) -> Result<Step, CoreError> {
    let task_id = at.resolve(pool).await?.id;
    StepRepo::find(pool, task_id, id)
        .await?
        .ok_or(CoreError::StepNotFound)
}

pub async fn update(
    pool: &DbPool,
    at: TaskPath,
    id: DbId,
    input: StepPatch,
) -> Result<Update, CoreError> {
    let changes = UpdateStep {
        description: patch(
            CONTEXT,
            "description",
            input.description.as_deref(),
            STEP_DESCRIPTION_MAX,
        )?,
        completed: input.completed,
    };
    let step = get(pool, at, id).await?;
    if changes.is_empty() {
        return Ok(Update::Nothing);
    }

    StepRepo::update(pool, step.task_id, id, &changes)
        .await?
        .ok_or(CoreError::StepNotFound)?;
    Ok(Update::Applied)
}

pub async fn delete(pool: &DbPool, at: TaskPath, id: DbId) -> Result<(), CoreError> {
    let task_id = at.resolve(pool).await?.id;
    if !StepRepo::delete(pool, task_id, id).await? {
        return Err(CoreError::StepNotFound);
    }
    Ok(())
}

//! Route definitions for tasks and everything hanging off a task.
//!
//! Two routers are provided:
//! - `router()` for the cross-list views mounted at `/me/tasks`
//! - `list_router()` for list-scoped task routes mounted at `/me/lists`

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{attachments, steps, tasks};
use crate::state::AppState;

/// Routes mounted at `/me/tasks`.
///
/// ```text
/// GET /              -> list_all_tasks
/// GET /trashed       -> list_trashed_tasks
/// GET /{task_uuid}   -> get_any_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_all_tasks))
        .route("/trashed", get(tasks::list_trashed_tasks))
        .route("/{task_uuid}", get(tasks::get_any_task))
}

/// List-scoped routes mounted at `/me/lists`.
///
/// ```text
/// GET    /{l}/tasks                          -> list_tasks
/// POST   /{l}/tasks                          -> create_task
/// GET    /{l}/tasks/{t}                      -> get_task
/// PATCH  /{l}/tasks/{t}                      -> update_task
/// DELETE /{l}/tasks/{t}                      -> delete_task
/// POST   /{l}/tasks/{t}/complete             -> complete_task
/// POST   /{l}/tasks/{t}/resume               -> resume_task
/// POST   /{l}/tasks/{t}/pin                  -> pin_task
/// POST   /{l}/tasks/{t}/unpin                -> unpin_task
/// POST   /{l}/tasks/{t}/trash                -> trash_task
/// POST   /{l}/tasks/{t}/restore              -> restore_task
/// POST   /{l}/tasks/{t}/today                -> today_task
/// POST   /{l}/tasks/{t}/tomorrow             -> tomorrow_task
/// POST   /{l}/tasks/{t}/defer                -> defer_task
/// POST   /{l}/tasks/{t}/move                 -> move_task
/// POST   /{l}/tasks/{t}/reorder              -> reorder_task
/// GET    /{l}/tasks/{t}/steps                -> list_steps
/// POST   /{l}/tasks/{t}/steps                -> create_step
/// GET    /{l}/tasks/{t}/steps/{s}            -> get_step
/// PATCH  /{l}/tasks/{t}/steps/{s}            -> update_step
/// DELETE /{l}/tasks/{t}/steps/{s}            -> delete_step
/// GET    /{l}/tasks/{t}/attachments          -> list_attachments
/// POST   /{l}/tasks/{t}/attachments          -> create_attachment
/// GET    /{l}/tasks/{t}/attachments/{a}      -> get_attachment
/// DELETE /{l}/tasks/{t}/attachments/{a}      -> delete_attachment
/// ```
pub fn list_router() -> Router<AppState> {
    const TASK: &str = "/{list_uuid}/tasks/{task_uuid}";

    Router::new()
        .route(
            "/{list_uuid}/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            TASK,
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(&format!("{TASK}/complete"), post(tasks::complete_task))
        .route(&format!("{TASK}/resume"), post(tasks::resume_task))
        .route(&format!("{TASK}/pin"), post(tasks::pin_task))
        .route(&format!("{TASK}/unpin"), post(tasks::unpin_task))
        .route(&format!("{TASK}/trash"), post(tasks::trash_task))
        .route(&format!("{TASK}/restore"), post(tasks::restore_task))
        .route(&format!("{TASK}/today"), post(tasks::today_task))
        .route(&format!("{TASK}/tomorrow"), post(tasks::tomorrow_task))
        .route(&format!("{TASK}/defer"), post(tasks::defer_task))
        .route(&format!("{TASK}/move"), post(tasks::move_task))
        .route(&format!("{TASK}/reorder"), post(tasks::reorder_task))
        .route(
            &format!("{TASK}/steps"),
            get(steps::list_steps).post(steps::create_step),
        )
        .route(
            &format!("{TASK}/steps/{{step_uuid}}"),
            get(steps::get_step)
                .patch(steps::update_step)
                .delete(steps::delete_step),
        )
        .route(
            &format!("{TASK}/attachments"),
            get(attachments::list_attachments).post(attachments::create_attachment),
        )
        .route(
            &format!("{TASK}/attachments/{{attachment_uuid}}"),
            get(attachments::get_attachment).delete(attachments::delete_attachment),
        )
}

//! HTTP-level integration tests for tasks and the resources hanging off them.

mod common;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use common::{
    body_json, create_list, create_task, delete_auth, expect_error, get_auth, patch_json_auth,
    post_auth, post_json_auth, put_auth, register,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn fetch_task(pool: &PgPool, token: &str, list: &str, task: &str) -> Value {
    let uri = format!("/me/lists/{list}/tasks/{task}");
    let response = get_auth(common::build_test_app(pool.clone()), &uri, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn titles_in(pool: &PgPool, token: &str, list: &str) -> Vec<String> {
    let uri = format!("/me/lists/{list}/tasks");
    let json = body_json(get_auth(common::build_test_app(pool.clone()), &uri, token).await).await;
    json["payload"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

async fn verb(pool: &PgPool, token: &str, list: &str, task: &str, action: &str) -> StatusCode {
    let uri = format!("/me/lists/{list}/tasks/{task}/{action}");
    post_auth(common::build_test_app(pool.clone()), &uri, token).await.status()
}

// ---------------------------------------------------------------------------
// Create and read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_task_defaults(pool: PgPool) {
    let (user_id, token) = register(&pool, "tasks@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Inbox").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/me/lists/{list}/tasks"),
        &token,
        json!({ "title": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = body_json(response).await["task_id"].as_str().unwrap().to_string();

    let json = fetch_task(&pool, &token, &list, &task).await;
    assert_eq!(json["title"], "Untitled");
    assert_eq!(json["priority"], "medium");
    assert_eq!(json["status"], "incomplete");
    assert_eq!(json["position_in_list"], 1);
    assert_eq!(json["is_pinned"], false);
    assert_eq!(json["owner_id"], user_id.to_string());
    assert!(json["due_date"].is_null());

    let response = get_auth(common::build_test_app(pool), &format!("/me/tasks/{task}"), &token).await;
    assert_eq!(body_json(response).await["id"], task.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overdue_task_reads_as_decayed(pool: PgPool) {
    let (_, token) = register(&pool, "decay@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Late").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/me/lists/{list}/tasks"),
        &token,
        json!({ "title": "Taxes", "due_date": "2001-04-15T00:00:00Z" }),
    )
    .await;
    let task = body_json(response).await["task_id"].as_str().unwrap().to_string();
    assert_eq!(fetch_task(&pool, &token, &list, &task).await["status"], "decayed");

    assert_eq!(verb(&pool, &token, &list, &task, "complete").await, StatusCode::NO_CONTENT);
    let json = fetch_task(&pool, &token, &list, &task).await;
    assert_eq!(json["status"], "complete");
    assert!(json["completed_at"].is_string());

    assert_eq!(verb(&pool, &token, &list, &task, "resume").await, StatusCode::NO_CONTENT);
    let json = fetch_task(&pool, &token, &list, &task).await;
    assert_eq!(json["status"], "decayed");
    assert!(json["completed_at"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reminder_after_deadline_is_rejected(pool: PgPool) {
    let (_, token) = register(&pool, "sched@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Plans").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/me/lists/{list}/tasks"),
        &token,
        json!({
            "title": "Trip",
            "due_date": "2040-01-01T00:00:00Z",
            "remind_at": "2040-01-02T00:00:00Z"
        }),
    )
    .await;
    expect_error(response, 400, "S0005").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/me/lists/{list}/tasks"),
        &token,
        json!({ "priority": "urgent" }),
    )
    .await;
    expect_error(response, 400, "RQ001").await;
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_patch_sets_and_clears_dates(pool: PgPool) {
    let (_, token) = register(&pool, "patch@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Dates").await;
    let task = create_task(&pool, &token, &list, "Dentist").await;
    let uri = format!("/me/lists/{list}/tasks/{task}");

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &token,
        json!({
            "priority": "high",
            "due_date": "2040-06-01T10:00:00Z",
            "remind_at": "2040-06-01T09:00:00Z"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let json = fetch_task(&pool, &token, &list, &task).await;
    assert_eq!(json["priority"], "high");
    assert!(json["due_date"].is_string());

    // Moving the deadline before the stored reminder is refused.
    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &token,
        json!({ "due_date": "2040-06-01T08:00:00Z" }),
    )
    .await;
    expect_error(response, 400, "S0005").await;

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &token,
        json!({ "due_date": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let json = fetch_task(&pool, &token, &list, &task).await;
    assert!(json["due_date"].is_null());
    assert!(json["remind_at"].is_string());

    let response = patch_json_auth(common::build_test_app(pool), &uri, &token, json!({ "title": "" })).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], uri);
}

// ---------------------------------------------------------------------------
// Verbs and placement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pinned_tasks_lead_the_list(pool: PgPool) {
    let (_, token) = register(&pool, "pin@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Mixed").await;
    create_task(&pool, &token, &list, "First").await;
    let second = create_task(&pool, &token, &list, "Second").await;

    assert_eq!(verb(&pool, &token, &list, &second, "pin").await, StatusCode::NO_CONTENT);
    assert_eq!(titles_in(&pool, &token, &list).await, ["Second", "First"]);

    assert_eq!(verb(&pool, &token, &list, &second, "unpin").await, StatusCode::NO_CONTENT);
    assert_eq!(titles_in(&pool, &token, &list).await, ["First", "Second"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_trash_and_restore(pool: PgPool) {
    let (_, token) = register(&pool, "trash@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Bin").await;
    let task = create_task(&pool, &token, &list, "Old idea").await;

    assert_eq!(verb(&pool, &token, &list, &task, "trash").await, StatusCode::NO_CONTENT);
    assert!(titles_in(&pool, &token, &list).await.is_empty());

    let json = body_json(get_auth(common::build_test_app(pool.clone()), "/me/tasks/trashed", &token).await).await;
    assert_eq!(json["retrieved"], 1);
    assert_eq!(json["payload"][0]["is_archived"], true);

    let json = body_json(get_auth(common::build_test_app(pool.clone()), "/me/tasks", &token).await).await;
    assert_eq!(json["retrieved"], 0);

    assert_eq!(verb(&pool, &token, &list, &task, "restore").await, StatusCode::NO_CONTENT);
    assert_eq!(titles_in(&pool, &token, &list).await, ["Old idea"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_clamps_and_shifts(pool: PgPool) {
    let (_, token) = register(&pool, "order@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Queue").await;
    create_task(&pool, &token, &list, "A").await;
    create_task(&pool, &token, &list, "B").await;
    let c = create_task(&pool, &token, &list, "C").await;

    let uri = format!("/me/lists/{list}/tasks/{c}/reorder");
    let response = post_json_auth(common::build_test_app(pool.clone()), &uri, &token, json!({ "position": 1 })).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(titles_in(&pool, &token, &list).await, ["C", "A", "B"]);

    let response = post_json_auth(common::build_test_app(pool.clone()), &uri, &token, json!({ "position": 99 })).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(titles_in(&pool, &token, &list).await, ["A", "B", "C"]);
    assert_eq!(fetch_task(&pool, &token, &list, &c).await["position_in_list"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_appends_and_closes_gap(pool: PgPool) {
    let (_, token) = register(&pool, "relocate@example.com").await;
    let from = create_list(&pool, &token, "/me/lists", "From").await;
    let to = create_list(&pool, &token, "/me/lists", "To").await;
    let a = create_task(&pool, &token, &from, "A").await;
    let b = create_task(&pool, &token, &from, "B").await;
    create_task(&pool, &token, &to, "X").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/me/lists/{from}/tasks/{a}/move"),
        &token,
        json!({ "list_id": to }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(fetch_task(&pool, &token, &to, &a).await["position_in_list"], 2);
    assert_eq!(fetch_task(&pool, &token, &from, &b).await["position_in_list"], 1);

    // The old address no longer reaches the task.
    let uri = format!("/me/lists/{from}/tasks/{a}");
    let response = get_auth(common::build_test_app(pool), &uri, &token).await;
    expect_error(response, 404, "R0006").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_today_moves_into_reserved_list(pool: PgPool) {
    let (_, token) = register(&pool, "today@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Backlog").await;
    let task = create_task(&pool, &token, &list, "Call mom").await;

    assert_eq!(verb(&pool, &token, &list, &task, "today").await, StatusCode::NO_CONTENT);

    let today = body_json(get_auth(common::build_test_app(pool.clone()), "/me/today", &token).await).await;
    let today = today["id"].as_str().unwrap().to_string();
    assert_eq!(titles_in(&pool, &token, &today).await, ["Call mom"]);
    assert!(titles_in(&pool, &token, &list).await.is_empty());
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_steps_lifecycle(pool: PgPool) {
    let (_, token) = register(&pool, "steps@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Recipes").await;
    let task = create_task(&pool, &token, &list, "Bread").await;
    let base = format!("/me/lists/{list}/tasks/{task}/steps");

    let response = post_json_auth(common::build_test_app(pool.clone()), &base, &token, json!({ "description": "Knead" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let step = body_json(response).await["step_id"].as_str().unwrap().to_string();

    let response = post_json_auth(common::build_test_app(pool.clone()), &base, &token, json!({ "description": "" })).await;
    expect_error(response, 400, "S0003").await;

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("{base}/{step}"),
        &token,
        json!({ "completed": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get_auth(common::build_test_app(pool.clone()), &format!("{base}/{step}"), &token).await).await;
    assert_eq!(json["description"], "Knead");
    assert_eq!(json["position"], 1);
    assert!(json["completed_at"].is_string());

    let response = delete_auth(common::build_test_app(pool.clone()), &format!("{base}/{step}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(common::build_test_app(pool), &format!("{base}/{step}"), &token).await;
    expect_error(response, 404, "R0011").await;
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tags_link_and_unlink(pool: PgPool) {
    let (_, token) = register(&pool, "tags@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Reading").await;
    let task = create_task(&pool, &token, &list, "Dune").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/me/tags",
        &token,
        json!({ "name": "sci-fi", "color": "#336699" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let tag = body_json(response).await["tag_id"].as_str().unwrap().to_string();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/me/tags",
        &token,
        json!({ "name": "sci-fi" }),
    )
    .await;
    expect_error(response, 400, "R0013").await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/me/tags",
        &token,
        json!({ "name": "novels", "color": "blue" }),
    )
    .await;
    expect_error(response, 400, "RQ002").await;

    let link = format!("/me/lists/{list}/tasks/{task}/tags/{tag}");
    for _ in 0..2 {
        let response = put_auth(common::build_test_app(pool.clone()), &link, &token).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let linked = format!("/me/lists/{list}/tasks/{task}/tags");
    let json = body_json(get_auth(common::build_test_app(pool.clone()), &linked, &token).await).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "sci-fi");

    let response = delete_auth(common::build_test_app(pool.clone()), &link, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let json = body_json(get_auth(common::build_test_app(pool.clone()), &linked, &token).await).await;
    assert!(json.as_array().unwrap().is_empty());

    let response = delete_auth(common::build_test_app(pool.clone()), &format!("/me/tags/{tag}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = put_auth(common::build_test_app(pool), &link, &token).await;
    expect_error(response, 404, "R0012").await;
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attachments_lifecycle(pool: PgPool) {
    let (_, token) = register(&pool, "files@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Docs").await;
    let task = create_task(&pool, &token, &list, "Passport").await;
    let base = format!("/me/lists/{list}/tasks/{task}/attachments");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &base,
        &token,
        json!({ "file_name": "scan.pdf", "file_url": "https://files.example.com/scan.pdf" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let attachment = body_json(response).await["attachment_id"].as_str().unwrap().to_string();

    let json = body_json(get_auth(common::build_test_app(pool.clone()), &base, &token).await).await;
    assert_eq!(json["retrieved"], 1);
    assert_eq!(json["payload"][0]["file_name"], "scan.pdf");

    let response = delete_auth(common::build_test_app(pool.clone()), &format!("{base}/{attachment}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(common::build_test_app(pool), &format!("{base}/{attachment}"), &token).await;
    expect_error(response, 404, "R0014").await;
}

// ---------------------------------------------------------------------------
// Deadlines
// ---------------------------------------------------------------------------

/// A write blocked on a row lock runs into the per-call database deadline,
/// and the client sees that deadline rather than the outer request ceiling.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stalled_write_reports_deadline_exceeded(pool: PgPool) {
    let (_, token) = register(&pool, "stalled@example.com").await;
    let list = create_list(&pool, &token, "/me/lists", "Locked").await;

    let mut blocker = pool.begin().await.unwrap();
    sqlx::query("SELECT id FROM lists WHERE id = $1::uuid FOR UPDATE")
        .bind(&list)
        .execute(&mut *blocker)
        .await
        .unwrap();

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/me/lists/{list}/tasks"),
        &token,
        json!({ "title": "Never lands" }),
    )
    .await;
    let json = expect_error(response, 504, "R0010").await;
    assert!(json["message"].is_string());

    blocker.rollback().await.unwrap();
    assert!(titles_in(&pool, &token, &list).await.is_empty());
}

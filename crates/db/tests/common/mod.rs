//! Shared fixtures for repository tests.

#![allow(dead_code)]

use noda_core::task::Priority;
use noda_core::types::DbId;
use noda_db::models::list::CreateList;
use noda_db::models::task::{CreateTask, Task};
use noda_db::models::user::{CreateUser, User};
use noda_db::repositories::{ListRepo, TaskRepo, UserRepo};
use sqlx::PgPool;

pub async fn create_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create_with_defaults(
        pool,
        &CreateUser {
            first_name: "Ada".to_string(),
            middle_name: None,
            last_name: "Lovelace".to_string(),
            surname: None,
            email: email.to_string(),
            password_hash: "$2b$12$stub".to_string(),
        },
    )
    .await
    .expect("user insert")
}

pub async fn create_list(pool: &PgPool, owner_id: DbId, group_id: Option<DbId>, name: &str) -> DbId {
    ListRepo::create(
        pool,
        owner_id,
        &CreateList {
            group_id,
            name: name.to_string(),
            description: String::new(),
        },
    )
    .await
    .expect("list insert")
    .id
}

pub async fn create_task(pool: &PgPool, owner_id: DbId, list_id: DbId, title: &str) -> Task {
    TaskRepo::create(
        pool,
        owner_id,
        list_id,
        &CreateTask {
            title: title.to_string(),
            headline: String::new(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
            remind_at: None,
        },
    )
    .await
    .expect("task insert")
    .expect("list exists")
}

/// Titles of a list's tasks ordered by position.
pub async fn titles_in_order(pool: &PgPool, list_id: DbId) -> Vec<(i32, String)> {
    sqlx::query_as(
        "SELECT position_in_list, title FROM tasks WHERE list_id = $1 ORDER BY position_in_list",
    )
    .bind(list_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

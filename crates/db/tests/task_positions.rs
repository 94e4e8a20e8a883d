mod common;

use noda_core::error::CoreError;
use noda_core::lists::ListKind;
use noda_core::query::CollectionQuery;
use noda_core::task::TaskStatus;
use noda_db::models::group::CreateGroup;
use noda_db::models::task::{TaskFilter, UpdateTask};
use noda_db::repositories::{GroupRepo, ListRepo, StepRepo, TagRepo, TaskRepo};
use noda_db::models::tag::CreateTag;
use sqlx::PgPool;

use common::{create_list, create_task, create_user, titles_in_order};

fn titles(rows: &[(i32, String)]) -> Vec<&str> {
    rows.iter().map(|(_, t)| t.as_str()).collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_positions_are_appended_densely(pool: PgPool) {
    let user = create_user(&pool, "pos@example.com").await;
    let list = create_list(&pool, user.id, None, "Chores").await;

    for title in ["a", "b", "c"] {
        create_task(&pool, user.id, list, title).await;
    }

    let rows = titles_in_order(&pool, list).await;
    assert_eq!(rows.iter().map(|(p, _)| *p).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_shifts_neighbours_and_clamps(pool: PgPool) {
    let user = create_user(&pool, "reorder@example.com").await;
    let list = create_list(&pool, user.id, None, "Chores").await;
    let a = create_task(&pool, user.id, list, "a").await;
    create_task(&pool, user.id, list, "b").await;
    let c = create_task(&pool, user.id, list, "c").await;

    let moved = TaskRepo::reorder(&pool, user.id, list, c.id, 1).await.unwrap();
    assert_eq!(moved, Some(1));
    assert_eq!(titles(&titles_in_order(&pool, list).await), vec!["c", "a", "b"]);

    let moved = TaskRepo::reorder(&pool, user.id, list, a.id, 99).await.unwrap();
    assert_eq!(moved, Some(3));
    assert_eq!(titles(&titles_in_order(&pool, list).await), vec!["c", "b", "a"]);

    let moved = TaskRepo::reorder(&pool, user.id, list, a.id, -4).await.unwrap();
    assert_eq!(moved, Some(1));
    assert_eq!(titles(&titles_in_order(&pool, list).await), vec!["a", "c", "b"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_and_relocate_close_gaps(pool: PgPool) {
    let user = create_user(&pool, "gap@example.com").await;
    let source = create_list(&pool, user.id, None, "Source").await;
    let target = create_list(&pool, user.id, None, "Target").await;
    let a = create_task(&pool, user.id, source, "a").await;
    let b = create_task(&pool, user.id, source, "b").await;
    create_task(&pool, user.id, source, "c").await;
    create_task(&pool, user.id, target, "x").await;

    assert!(TaskRepo::delete(&pool, user.id, source, a.id).await.unwrap());
    let rows = titles_in_order(&pool, source).await;
    assert_eq!(rows, vec![(1, "b".to_string()), (2, "c".to_string())]);

    assert!(TaskRepo::relocate(&pool, user.id, source, b.id, target).await.unwrap());
    assert_eq!(titles_in_order(&pool, source).await, vec![(1, "c".to_string())]);
    assert_eq!(
        titles_in_order(&pool, target).await,
        vec![(1, "x".to_string()), (2, "b".to_string())]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tasks_are_isolated_per_owner(pool: PgPool) {
    let owner = create_user(&pool, "owner@example.com").await;
    let intruder = create_user(&pool, "intruder@example.com").await;
    let list = create_list(&pool, owner.id, None, "Private").await;
    let task = create_task(&pool, owner.id, list, "secret").await;

    assert!(TaskRepo::find(&pool, intruder.id, None, task.id).await.unwrap().is_none());
    assert!(!TaskRepo::set_pinned(&pool, intruder.id, list, task.id, true).await.unwrap());
    assert!(!TaskRepo::delete(&pool, intruder.id, list, task.id).await.unwrap());
    assert_eq!(
        TaskRepo::reorder(&pool, intruder.id, list, task.id, 1).await.unwrap(),
        None
    );
    let intruder_today = ListRepo::find_reserved(&pool, intruder.id, ListKind::Today)
        .await
        .unwrap()
        .unwrap();
    assert!(!TaskRepo::relocate(&pool, intruder.id, list, task.id, intruder_today.id)
        .await
        .unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_status_archive_and_partial_update(pool: PgPool) {
    let user = create_user(&pool, "state@example.com").await;
    let list = create_list(&pool, user.id, None, "Work").await;
    let task = create_task(&pool, user.id, list, "report").await;

    assert!(TaskRepo::set_status(&pool, user.id, list, task.id, TaskStatus::Complete)
        .await
        .unwrap());
    let done = TaskRepo::find(&pool, user.id, Some(list), task.id).await.unwrap().unwrap();
    assert_eq!(done.status, TaskStatus::Complete);
    assert!(done.completed_at.is_some());

    assert!(TaskRepo::set_archived(&pool, user.id, list, task.id, true).await.unwrap());
    let visible = TaskRepo::list(&pool, user.id, TaskFilter::InList(list), &CollectionQuery::default())
        .await
        .unwrap();
    assert!(visible.is_empty());
    let trashed = TaskRepo::list(&pool, user.id, TaskFilter::Trashed, &CollectionQuery::default())
        .await
        .unwrap();
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0].position_in_list, 1);

    let due = chrono::Utc::now() + chrono::Duration::days(1);
    let updated = TaskRepo::update(
        &pool,
        user.id,
        list,
        task.id,
        &UpdateTask {
            headline: Some("quarterly".into()),
            due_date: Some(Some(due)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "report");
    assert_eq!(updated.headline, "quarterly");
    assert!(updated.due_date.is_some());

    let cleared = TaskRepo::update(
        &pool,
        user.id,
        list,
        task.id,
        &UpdateTask {
            due_date: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(cleared.due_date.is_none());
    assert_eq!(cleared.headline, "quarterly");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reminder_after_due_date_violates_schedule(pool: PgPool) {
    let user = create_user(&pool, "sched@example.com").await;
    let list = create_list(&pool, user.id, None, "Work").await;
    let task = create_task(&pool, user.id, list, "report").await;

    let due = chrono::Utc::now();
    let err = TaskRepo::update(
        &pool,
        user.id,
        list,
        task.id,
        &UpdateTask {
            due_date: Some(Some(due)),
            remind_at: Some(Some(due + chrono::Duration::hours(1))),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(CoreError::from(err), CoreError::InvalidSchedule);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_deep_copies_tasks_steps_and_tags(pool: PgPool) {
    let user = create_user(&pool, "dup@example.com").await;
    let group = GroupRepo::create(
        &pool,
        user.id,
        &CreateGroup {
            name: "Home".into(),
            description: String::new(),
        },
    )
    .await
    .unwrap();
    let list = create_list(&pool, user.id, Some(group.id), "Groceries").await;
    let milk = create_task(&pool, user.id, list, "milk").await;
    create_task(&pool, user.id, list, "eggs").await;
    StepRepo::create(&pool, milk.id, "check fridge").await.unwrap().unwrap();
    let tag = TagRepo::create(
        &pool,
        user.id,
        &CreateTag {
            name: "dairy".into(),
            color: None,
        },
    )
    .await
    .unwrap();
    TagRepo::link(&pool, milk.id, tag.id).await.unwrap();

    let replica = ListRepo::duplicate(&pool, user.id, list).await.unwrap().unwrap();
    assert_ne!(replica.id, list);
    assert_eq!(replica.group_id, Some(group.id));
    assert_eq!(replica.name, "Groceries");
    assert_eq!(titles(&titles_in_order(&pool, replica.id).await), vec!["milk", "eggs"]);

    let copied_milk: uuid::Uuid = sqlx::query_scalar(
        "SELECT id FROM tasks WHERE list_id = $1 AND title = 'milk'",
    )
    .bind(replica.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_ne!(copied_milk, milk.id);
    let steps = StepRepo::list(&pool, copied_milk, &CollectionQuery::default()).await.unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].description, "check fridge");
    let tags = TagRepo::list_for_task(&pool, copied_milk).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, tag.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reserved_lists_cannot_be_deleted_or_moved(pool: PgPool) {
    let user = create_user(&pool, "reserved@example.com").await;
    let group = GroupRepo::create(
        &pool,
        user.id,
        &CreateGroup {
            name: "Work".into(),
            description: String::new(),
        },
    )
    .await
    .unwrap();
    let today = ListRepo::find_reserved(&pool, user.id, ListKind::Today)
        .await
        .unwrap()
        .unwrap();

    assert!(!ListRepo::delete(&pool, user.id, today.id).await.unwrap());
    assert!(!ListRepo::set_group(&pool, user.id, today.id, Some(group.id)).await.unwrap());

    let replica = ListRepo::duplicate(&pool, user.id, today.id).await.unwrap().unwrap();
    assert_eq!(replica.kind, ListKind::Regular);
    assert!(replica.is_scattered());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_delete_cascades_to_lists_and_tasks(pool: PgPool) {
    let user = create_user(&pool, "cascade@example.com").await;
    let group = GroupRepo::create(
        &pool,
        user.id,
        &CreateGroup {
            name: "Trip".into(),
            description: String::new(),
        },
    )
    .await
    .unwrap();
    let list = create_list(&pool, user.id, Some(group.id), "Packing").await;
    let task = create_task(&pool, user.id, list, "passport").await;

    assert!(GroupRepo::delete(&pool, user.id, group.id).await.unwrap());
    assert!(ListRepo::find(&pool, user.id, None, list).await.unwrap().is_none());
    assert!(TaskRepo::find(&pool, user.id, None, task.id).await.unwrap().is_none());
}

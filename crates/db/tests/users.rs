mod common;

use assert_matches::assert_matches;
use noda_core::error::CoreError;
use noda_core::lists::ListKind;
use noda_core::query::CollectionQuery;
use noda_core::roles::Role;
use noda_core::settings::PREDEFINED_SETTINGS;
use noda_db::models::user::{CreateUser, UserFilter};
use noda_db::repositories::{ListRepo, SettingRepo, UserRepo};
use sqlx::PgPool;

use common::create_user;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_up_provisions_reserved_lists_and_settings(pool: PgPool) {
    let user = create_user(&pool, "ada@example.com").await;
    assert_eq!(user.role, Role::Regular);

    for kind in [ListKind::Today, ListKind::Tomorrow, ListKind::Deferred] {
        let list = ListRepo::find_reserved(&pool, user.id, kind)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("{kind} list missing"));
        assert!(list.is_scattered());
        assert_eq!(list.name, kind.default_name());
    }

    let settings = SettingRepo::list(&pool, user.id, &CollectionQuery::default())
        .await
        .unwrap();
    assert_eq!(settings.len(), PREDEFINED_SETTINGS.len());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_is_classified(pool: PgPool) {
    create_user(&pool, "dup@example.com").await;

    let err = UserRepo::create_with_defaults(
        &pool,
        &CreateUser {
            first_name: "Other".into(),
            middle_name: None,
            last_name: "Person".into(),
            surname: None,
            email: "dup@example.com".into(),
            password_hash: "x".into(),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(CoreError::from(err), CoreError::DuplicateEmail);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_frees_email(pool: PgPool) {
    let user = create_user(&pool, "gone@example.com").await;

    assert!(UserRepo::soft_delete(&pool, user.id).await.unwrap());
    assert!(!UserRepo::soft_delete(&pool, user.id).await.unwrap());
    assert!(!UserRepo::is_active(&pool, user.id).await.unwrap());
    assert!(UserRepo::find_by_email(&pool, "gone@example.com")
        .await
        .unwrap()
        .is_none());

    // The address can be registered again.
    create_user(&pool, "gone@example.com").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_hard_delete_cascades(pool: PgPool) {
    let user = create_user(&pool, "purge@example.com").await;
    assert!(UserRepo::hard_delete(&pool, user.id).await.unwrap());

    let lists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lists WHERE owner_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let settings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_settings WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((lists, settings), (0, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blocked_filter_and_search(pool: PgPool) {
    let a = create_user(&pool, "alpha@example.com").await;
    create_user(&pool, "beta@example.com").await;
    UserRepo::set_blocked(&pool, a.id, true).await.unwrap();

    let blocked = UserRepo::list(&pool, UserFilter::Blocked, &CollectionQuery::default())
        .await
        .unwrap();
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].id, a.id);

    let query = CollectionQuery::from_pairs([("search", "BETA")]).unwrap();
    let found = UserRepo::list(&pool, UserFilter::Active, &query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].email, "beta@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_setting_key_is_classified(pool: PgPool) {
    let user = create_user(&pool, "set@example.com").await;

    let err = SettingRepo::upsert(&pool, user.id, "no.such.key", &serde_json::json!(1))
        .await
        .unwrap_err();
    assert_matches!(CoreError::from(err), CoreError::SettingNotFound);

    SettingRepo::upsert(&pool, user.id, "appearance.theme", &serde_json::json!("dark"))
        .await
        .unwrap();
    let theme = SettingRepo::find(&pool, user.id, "appearance.theme")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(theme.value, serde_json::json!("dark"));
}

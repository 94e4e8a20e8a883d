//! Integration tests for the health endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, expect_error, get, post_json, register};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["database"], "reachable");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_is_target_not_found(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/this-route-does-not-exist").await;
    let json = expect_error(response, 404, "U0001").await;
    assert_eq!(json["message"], "The requested resource could not be found.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_method_is_method_not_allowed(pool: PgPool) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/login")
        .body(Body::empty())
        .unwrap();
    let response = common::build_test_app(pool).oneshot(request).await.unwrap();

    expect_error(response, 405, "U0007").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bare_options_is_answered_with_empty_200(pool: PgPool) {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/me/lists")
        .body(Body::empty())
        .unwrap();
    let response = common::build_test_app(pool).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    assert!(bytes.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_any_origin(pool: PgPool) {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/me")
        .header("Origin", "https://client.example")
        .header("Access-Control-Request-Method", "PATCH")
        .header("Access-Control-Request-Headers", "content-type,authorization")
        .body(Body::empty())
        .unwrap();
    let response = common::build_test_app(pool).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let methods = response.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap();
    assert!(methods.contains("PATCH"), "got {methods}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn body_without_json_content_type_is_unsupported(pool: PgPool) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"email":"a@b.co"}"#))
        .unwrap();
    let response = common::build_test_app(pool).oneshot(request).await.unwrap();

    expect_error(response, 415, "RQ005").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn body_verbs_without_a_body_need_no_content_type(pool: PgPool) {
    let (_, token) = register(&pool, "verbs@example.com").await;
    let list = common::create_list(&pool, &token, "/me/lists", "Errands").await;
    let task = common::create_task(&pool, &token, &list, "Milk").await;

    let uri = format!("/me/lists/{list}/tasks/{task}/complete");
    let response = common::post_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_body_is_malformed(pool: PgPool) {
    let padding = "x".repeat(noda_api::extract::BODY_LIMIT_BYTES + 1);
    let body = serde_json::json!({ "email": "a@b.co", "password": padding });
    let response = post_json(common::build_test_app(pool), "/login", body).await;

    let json = expect_error(response, 400, "RQ001").await;
    assert_eq!(json["details"][0], noda_api::extract::BODY_TOO_LARGE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_is_described(pool: PgPool) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email": "a@b.co", "password": "x", "extra": 1}"#))
        .unwrap();
    let response = common::build_test_app(pool).oneshot(request).await.unwrap();

    let json = expect_error(response, 400, "RQ001").await;
    assert_eq!(json["details"][0], "Body contains unknown key \"extra\".");
}

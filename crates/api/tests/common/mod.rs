//! Shared helpers for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use noda_api::config::ServerConfig;
use noda_api::router::build_app_router;
use noda_api::state::AppState;
use noda_core::roles::Role;
use noda_core::types::DbId;
use noda_db::repositories::UserRepo;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Abcdef1!";

/// Build a test `ServerConfig` from the production defaults.
///
/// The pool is handed in by `sqlx::test`, so the connection string only has
/// to parse.
pub fn test_config() -> ServerConfig {
    ServerConfig::from_lookup(|name| match name {
        "SERVER_HOST" => Some("127.0.0.1".to_string()),
        "DB_CONN_STRING" => Some("postgres://localhost/noda_test".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .expect("test configuration loads")
}

/// Build the full application router over the given pool, with the same
/// middleware stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST without a body, as used by the task and list verbs.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert an error envelope and return it.
pub async fn expect_error(response: Response, status: u16, code: &str) -> serde_json::Value {
    assert_eq!(response.status().as_u16(), status);
    let json = body_json(response).await;
    assert_eq!(json["error_code"], code, "unexpected envelope: {json}");
    json
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Sign up through the API and return the new user's id.
pub async fn sign_up(pool: &PgPool, email: &str) -> DbId {
    let body = serde_json::json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "password": PASSWORD,
    });
    let response = post_json(build_test_app(pool.clone()), "/signup", body).await;
    assert_eq!(response.status(), 201);
    let json = body_json(response).await;
    json["user_id"].as_str().unwrap().parse().unwrap()
}

/// Sign in through the API and return the bearer token.
pub async fn login(pool: &PgPool, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": PASSWORD });
    let response = post_json(build_test_app(pool.clone()), "/login", body).await;
    assert_eq!(response.status(), 200);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

/// Sign up and sign in, returning the user id and a token.
pub async fn register(pool: &PgPool, email: &str) -> (DbId, String) {
    let id = sign_up(pool, email).await;
    let token = login(pool, email).await;
    (id, token)
}

/// Register an administrator. The role is granted before signing in so the
/// token carries it.
pub async fn register_admin(pool: &PgPool, email: &str) -> (DbId, String) {
    let id = sign_up(pool, email).await;
    UserRepo::set_role(pool, id, Role::Admin).await.unwrap();
    let token = login(pool, email).await;
    (id, token)
}

/// Create a list through the API and return its id.
pub async fn create_list(pool: &PgPool, token: &str, uri: &str, name: &str) -> String {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        uri,
        token,
        serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["list_id"].as_str().unwrap().to_string()
}

/// Create a task in a list through the API and return its id.
pub async fn create_task(pool: &PgPool, token: &str, list_id: &str, title: &str) -> String {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/me/lists/{list_id}/tasks"),
        token,
        serde_json::json!({ "title": title }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["task_id"].as_str().unwrap().to_string()
}

//! 用户/认证 API 集成测试
//! 需要 PostgreSQL（通过 TEST_DATABASE_URL 指定），因此默认忽略

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{create_test_app_state, create_test_config, register_test_user, setup_test_db};

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_register_success() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = todo_service::routes::create_router(state);

    let response = app
        .oneshot(post_json(
            "/users",
            json!({"email": "a@b.com", "password": "abcdef"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // 响应头携带新签发的令牌
    let token = response
        .headers()
        .get("x-auth")
        .expect("x-auth header missing")
        .to_str()
        .unwrap()
        .to_string();
    assert!(!token.is_empty());

    // 响应体只含 id 和 email，绝不含密码或令牌
    let json = body_json(response).await;
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(object["email"], "a@b.com");
    assert!(object["id"].is_string());
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_register_stores_hash_not_plaintext() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool.clone()).await;
    let app = todo_service::routes::create_router(state);

    let response = app
        .oneshot(post_json(
            "/users",
            json!({"email": "a@b.com", "password": "abcdef"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored: (String,) =
        sqlx::query_as("SELECT password_hash FROM users WHERE email = 'a@b.com'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_ne!(stored.0, "abcdef");
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_register_duplicate_email() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = todo_service::routes::create_router(state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/users",
            json!({"email": "a@b.com", "password": "abcdef"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post_json(
            "/users",
            json!({"email": "a@b.com", "password": "ghijkl"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_register_rejects_bad_input() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = todo_service::routes::create_router(state);

    // 非法邮箱
    let response = app
        .clone()
        .oneshot(post_json(
            "/users",
            json!({"email": "not-an-email", "password": "abcdef"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // 密码过短
    let response = app
        .oneshot(post_json(
            "/users",
            json!({"email": "a@b.com", "password": "abcde"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_login_success_and_wrong_password() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = todo_service::routes::create_router(state.clone());

    register_test_user(&state, "a@b.com", "abcdef").await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/users/login",
            json!({"email": "a@b.com", "password": "abcdef"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-auth").is_some());

    let response = app
        .oneshot(post_json(
            "/users/login",
            json!({"email": "a@b.com", "password": "wrongpw"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_me_with_valid_token() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = todo_service::routes::create_router(state.clone());

    let (user_id, token) = register_test_user(&state, "a@b.com", "abcdef").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/me")
                .header("x-auth", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], json!(user_id));
    assert_eq!(json["email"], "a@b.com");
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_me_with_garbage_token() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = todo_service::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/me")
                .header("x-auth", "garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_me_without_token() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = todo_service::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_revoked_token_is_no_user_found() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = todo_service::routes::create_router(state.clone());

    let (_, token) = register_test_user(&state, "a@b.com", "abcdef").await;

    // 登出撤销令牌
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/users/me/token")
                .header("x-auth", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 同一令牌签名仍然有效，但存储中已无活跃记录 -> 404
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/me")
                .header("x-auth", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["msg"], "No user found");
}

#[tokio::test]
#[ignore] // 需要数据库
async fn test_email_is_normalized() {
    let config = create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = todo_service::routes::create_router(state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/users",
            json!({"email": "  A@B.com  ", "password": "abcdef"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["email"], "a@b.com");

    // 规范化后与已有邮箱冲突
    let response = app
        .oneshot(post_json(
            "/users",
            json!({"email": "a@b.com", "password": "abcdef"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

//! 错误模型单元测试
//! 校验错误分类到 HTTP 状态码与响应体的映射

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use todo_service::error::AppError;

#[test]
fn test_status_code_mapping() {
    assert_eq!(AppError::Validation("bad".into()).code(), 400);
    assert_eq!(AppError::BadRequest("bad".into()).code(), 400);
    assert_eq!(AppError::InvalidCredentials.code(), 401);
    assert_eq!(AppError::InvalidToken.code(), 401);
    assert_eq!(AppError::NoUserFound.code(), 404);
    assert_eq!(AppError::NotFound.code(), 404);
    assert_eq!(AppError::Database(sqlx::Error::RowNotFound).code(), 500);
    assert_eq!(AppError::Config("bad".into()).code(), 500);
    assert_eq!(AppError::Internal("bad".into()).code(), 500);
}

#[tokio::test]
async fn test_response_body_is_msg_envelope() {
    let response = AppError::NoUserFound.into_response();
    assert_eq!(response.status(), 404);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(object["msg"], "No user found");
}

#[tokio::test]
async fn test_internal_errors_do_not_leak_details() {
    let response =
        AppError::Internal("connection string postgres://secret".to_string()).into_response();
    assert_eq!(response.status(), 500);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(!body.contains("postgres://"));
    assert!(body.contains("Internal server error"));
}

#[tokio::test]
async fn test_validation_message_is_surfaced() {
    let response = AppError::Validation("invalid email address".to_string()).into_response();
    assert_eq!(response.status(), 400);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["msg"], "invalid email address");
}

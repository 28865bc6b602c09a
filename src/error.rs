//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// 输入校验失败（邮箱格式、密码长度、唯一性冲突等）
    #[error("{0}")]
    Validation(String),

    /// 登录凭证错误
    #[error("Authentication failed")]
    InvalidCredentials,

    /// 令牌签名/格式/过期校验失败
    #[error("Invalid authentication token")]
    InvalidToken,

    /// 令牌签名有效，但存储中没有对应的活跃记录
    #[error("No user found")]
    NoUserFound,

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::NoUserFound | AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::InvalidCredentials => "Authentication failed".to_string(),
            AppError::InvalidToken => "Invalid authentication token".to_string(),
            AppError::NoUserFound => "No user found".to_string(),
            AppError::NotFound => "Resource not found".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }
}

/// 错误响应 DTO
/// 响应体固定为 {"msg": ...}，与 API 对外契约一致
#[derive(Serialize)]
pub struct ErrorBody {
    pub msg: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 记录错误日志；5xx 记为 error，客户端错误记为 debug
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Application error");
        } else {
            tracing::debug!(code = self.code(), error = %self, "Request rejected");
        }

        let body = ErrorBody {
            msg: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// 从 String 转换为 AppError::Config
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Config(s)
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

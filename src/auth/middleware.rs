//! 认证中间件（访问门）
//! 包裹受保护路由：提取 x-auth 头，验证令牌，在请求扩展中附加用户身份

use crate::{error::AppError, middleware::AppState, models::user::User};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// 承载令牌的请求头
pub const AUTH_HEADER: &str = "x-auth";

/// 认证上下文（附加到请求扩展）
/// 携带已解析的用户记录和原始令牌
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 CurrentUser
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}

/// 从 x-auth 头提取令牌
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or(AppError::InvalidToken)
}

/// 认证中间件 - 必须认证
///
/// 拒绝路径由中间件自身终结请求：
/// 签名/格式失败 -> 401，签名有效但存储中无活跃记录 -> 404。
/// 被包裹的 handler 在失败时绝不会被调用。
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 从 x-auth 头提取令牌
    let token = extract_token(req.headers())?;

    // 验证令牌（先签名，后存储成员检查）
    let user = state.user_service.verify_token(&token).await?;

    // 附加到请求扩展
    req.extensions_mut().insert(CurrentUser { user, token });

    Ok(next.run(req).await)
}

//! 用户与认证的 HTTP 处理器

use crate::{
    auth::middleware::{CurrentUser, AUTH_HEADER},
    error::AppError,
    middleware::AppState,
    models::user::*,
};
use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 注册
/// 成功时在 x-auth 响应头中返回新签发的令牌，响应体只含 {id, email}
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = state.user_service.register(req).await?;

    Ok((
        auth_header(&token)?,
        Json(UserResponse::from(user)),
    ))
}

/// 登录
/// 与注册一样通过 x-auth 头返回新令牌
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (user, token) = state.user_service.login(req).await?;

    Ok((
        auth_header(&token)?,
        Json(UserResponse::from(user)),
    ))
}

/// 获取当前用户信息
/// 身份由访问门中间件解析并注入
pub async fn get_current_user(current: CurrentUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(UserResponse::from(current.user)))
}

/// 登出：撤销本次请求携带的令牌
pub async fn logout_user(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    state
        .user_service
        .revoke_token(current.user.id, &current.token)
        .await?;

    Ok(Json(json!({"message": "已成功登出"})))
}

/// 构造携带令牌的响应头
fn auth_header(token: &str) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    let value = token
        .parse()
        .map_err(|_| AppError::Internal("token is not a valid header value".to_string()))?;
    headers.insert(AUTH_HEADER, value);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_header_carries_token() {
        let headers = auth_header("abc.def.ghi").unwrap();
        assert_eq!(headers.get(AUTH_HEADER).unwrap(), "abc.def.ghi");
    }
}

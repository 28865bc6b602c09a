//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查与指标）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics_export));

    // 用户路由（注册/登录无需认证）
    let user_routes = Router::new()
        .route("/users", post(handlers::user::register_user))
        .route("/users/login", post(handlers::user::login_user));

    // 需要认证的路由（由访问门包裹，失败时 handler 不会被调用）
    let authenticated_routes = Router::new()
        .route("/users/me", get(handlers::user::get_current_user))
        .route("/users/me/token", delete(handlers::user::logout_user))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::auth_middleware,
        ));

    // 待办路由（与对外 API 保持一致，不做认证）
    let todo_routes = Router::new()
        .route(
            "/todos",
            get(handlers::todo::list_todos).post(handlers::todo::create_todo),
        )
        .route(
            "/todos/{id}",
            get(handlers::todo::get_todo)
                .patch(handlers::todo::update_todo)
                .delete(handlers::todo::delete_todo),
        );

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(authenticated_routes)
        .merge(todo_routes)
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}

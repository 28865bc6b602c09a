//! 待办事项的 HTTP 处理器

use crate::{
    error::AppError,
    middleware::AppState,
    models::todo::*,
    repository::todo_repo::TodoRepository,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 创建待办
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTodoRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // 与存储保持一致：先去空白，再校验非空
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let repo = TodoRepository::new(state.db.clone());
    let todo = repo.create(text).await?;

    Ok(Json(todo))
}

/// 列出全部待办
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let repo = TodoRepository::new(state.db.clone());
    let todos = repo.list().await?;

    Ok(Json(json!({
        "todos": todos,
        "count": todos.len()
    })))
}

/// 获取待办详情
pub async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_todo_id(&id)?;

    let repo = TodoRepository::new(state.db.clone());
    let todo = repo.find_by_id(&id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(json!({"todo": todo})))
}

/// 更新待办
/// completed 置为 true 时写入 completed_at，否则强制清除
pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_todo_id(&id)?;

    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let text = req.text.as_deref().map(str::trim);
    if text == Some("") {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let (completed, completed_at) = match req.completed {
        Some(true) => (true, Some(Utc::now())),
        _ => (false, None),
    };

    let repo = TodoRepository::new(state.db.clone());
    let todo = repo
        .update(id, text, completed, completed_at)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(json!({"todo": todo})))
}

/// 删除待办，返回被删除的记录
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_todo_id(&id)?;

    let repo = TodoRepository::new(state.db.clone());
    let todo = repo.delete(id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(json!({"todo": todo})))
}

/// 路径参数解析
/// 非法 ID 与不存在的 ID 同样映射为 404
fn parse_todo_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

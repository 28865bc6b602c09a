//! Todo repository (数据库访问层)

use crate::{error::AppError, models::todo::Todo};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct TodoRepository {
    db: PgPool,
}

impl TodoRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建待办
    pub async fn create(&self, text: &str) -> Result<Todo, AppError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (text)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(text)
        .fetch_one(&self.db)
        .await?;

        Ok(todo)
    }

    /// 列出全部待办（按创建时间排序）
    pub async fn list(&self) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>("SELECT * FROM todos ORDER BY created_at ASC")
            .fetch_all(&self.db)
            .await?;

        Ok(todos)
    }

    /// 根据 ID 查找待办
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(todo)
    }

    /// 更新待办
    /// completed/completed_at 总是整体写入，text 为 None 时保持原值
    pub async fn update(
        &self,
        id: Uuid,
        text: Option<&str>,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET
                text = COALESCE($2, text),
                completed = $3,
                completed_at = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(text)
        .bind(completed)
        .bind(completed_at)
        .fetch_optional(&self.db)
        .await?;

        Ok(todo)
    }

    /// 删除待办，返回被删除的记录
    pub async fn delete(&self, id: Uuid) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>("DELETE FROM todos WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(todo)
    }
}

//! User repository (数据库访问层)
//! users 表与 user_tokens 表的全部 SQL 都在这里

use crate::{error::AppError, models::user::*};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建用户
    /// 邮箱唯一性由存储层的唯一索引强制，冲突映射为校验错误
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Validation("email already registered".to_string())
            }
            _ => AppError::from(e),
        })?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 追加一条已签发令牌记录（单条 INSERT，即原子追加）
    pub async fn append_token(
        &self,
        user_id: Uuid,
        access: &str,
        token_hash: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_tokens (user_id, access, token_hash)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(access)
        .bind(token_hash)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 成员检查：ID 匹配且令牌仍然"活跃"（摘要在 user_tokens 中）
    /// 两个条件缺一不可
    pub async fn find_by_id_and_token(
        &self,
        user_id: &Uuid,
        access: &str,
        token_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM users u
            JOIN user_tokens t ON t.user_id = u.id
            WHERE u.id = $1 AND t.access = $2 AND t.token_hash = $3
            "#,
        )
        .bind(user_id)
        .bind(access)
        .bind(token_hash)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 撤销一条令牌记录（登出）
    pub async fn delete_token(&self, user_id: Uuid, token_hash: &str) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND token_hash = $2")
                .bind(user_id)
                .bind(token_hash)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 哈希令牌用于存储（存储摘要，不存原始令牌）
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

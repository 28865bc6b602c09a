//! 用户服务：注册、登录、令牌签发与验证、令牌撤销

use crate::{
    auth::password::PasswordHasher,
    auth::token::TokenService,
    config::AppConfig,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, User, ACCESS_AUTH},
    repository::user_repo::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidateEmail;

pub struct UserService {
    db: PgPool,
    token_service: Arc<TokenService>,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn new(db: PgPool, token_service: Arc<TokenService>, config: Arc<AppConfig>) -> Self {
        Self {
            db,
            token_service,
            config,
        }
    }

    /// 用户注册
    /// 校验输入，哈希密码后落库，随后签发首个令牌
    pub async fn register(&self, req: CreateUserRequest) -> Result<(User, String), AppError> {
        // 规范化邮箱：去空白、小写
        let email = req.email.trim().to_lowercase();
        if email.is_empty() || !email.validate_email() {
            return Err(AppError::Validation("invalid email address".to_string()));
        }

        // 验证密码策略
        PasswordHasher::validate_password_policy(&req.password, &self.config)?;

        // 哈希密码（绝不存明文）
        let hasher = PasswordHasher::new();
        let password_hash = hasher.hash(&req.password)?;

        let repo = UserRepository::new(self.db.clone());
        let user = repo.create(&email, &password_hash).await?;

        tracing::info!(user_id = %user.id, "User registered");

        let token = self.issue_token(user.id).await?;

        Ok((user, token))
    }

    /// 用户登录
    /// 按邮箱查找并验证密码，成功后签发新令牌
    pub async fn login(&self, req: LoginRequest) -> Result<(User, String), AppError> {
        let email = req.email.trim().to_lowercase();

        let repo = UserRepository::new(self.db.clone());
        let user = repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // 验证密码（argon2 内部为常数时间比较）
        let hasher = PasswordHasher::new();
        hasher.verify(&req.password, &user.password_hash)?;

        let token = self.issue_token(user.id).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, token))
    }

    /// 签发令牌
    /// 先把摘要追加到存储，再把令牌返回给调用方
    pub async fn issue_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let token = self.token_service.sign(&user_id)?;

        let repo = UserRepository::new(self.db.clone());
        let token_hash = UserRepository::hash_token(&token);
        repo.append_token(user_id, ACCESS_AUTH, &token_hash).await?;

        Ok(token)
    }

    /// 验证令牌并解析出其所有者
    ///
    /// 顺序不可颠倒：先做签名校验（失败 -> InvalidToken，不触库），
    /// 再做存储成员检查（ID 匹配且摘要仍在 user_tokens 中，
    /// 否则 -> NoUserFound）。成员检查使未来的撤销立即生效。
    pub async fn verify_token(&self, token: &str) -> Result<User, AppError> {
        let claims = self.token_service.verify(token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        let repo = UserRepository::new(self.db.clone());
        let token_hash = UserRepository::hash_token(token);

        repo.find_by_id_and_token(&user_id, ACCESS_AUTH, &token_hash)
            .await?
            .ok_or(AppError::NoUserFound)
    }

    /// 撤销令牌（登出）
    /// 删除对应摘要行后，同一令牌再次通过验证时会落入 NoUserFound
    pub async fn revoke_token(&self, user_id: Uuid, token: &str) -> Result<(), AppError> {
        let repo = UserRepository::new(self.db.clone());
        let token_hash = UserRepository::hash_token(token);

        repo.delete_token(user_id, &token_hash).await?;

        tracing::info!(user_id = %user_id, "Token revoked");

        Ok(())
    }
}

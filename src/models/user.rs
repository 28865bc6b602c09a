//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access class tag for issued tokens. Only one class exists.
pub const ACCESS_AUTH: &str = "auth";

/// User account row.
///
/// Deliberately does NOT implement `Serialize`: the only outward
/// representation of a user is [`UserResponse`], so `password_hash` can
/// never end up in a response body.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One issued token, stored as a SHA-256 digest under an access class.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub access: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registration request body
#[derive(Debug, Deserialize, validator::Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User response (without sensitive data)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

//! Todo domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Todo item row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create request. Unknown body fields are dropped by serde, which is the
/// field whitelist for this route.
#[derive(Debug, Deserialize, validator::Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
}

/// Update request. Only `text` and `completed` are accepted.
#[derive(Debug, Deserialize, validator::Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_todo_rejects_empty_text() {
        let request = CreateTodoRequest {
            text: "".to_string(),
        };
        assert!(request.validate().is_err());

        let request = CreateTodoRequest {
            text: "buy milk".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_ignores_unknown_fields() {
        // completedAt 由服务端维护，客户端传入会被丢弃
        let body = serde_json::json!({
            "text": "walk the dog",
            "completed": true,
            "completed_at": "2024-01-01T00:00:00Z",
            "id": "11111111-1111-1111-1111-111111111111"
        });

        let request: UpdateTodoRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.text.as_deref(), Some("walk the dog"));
        assert_eq!(request.completed, Some(true));
    }

    #[test]
    fn test_todo_serializes_completed_at_null() {
        let todo = Todo {
            id: Uuid::new_v4(),
            text: "buy milk".to_string(),
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["completed"], false);
        assert!(json["completed_at"].is_null());
    }
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for question
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub detail: String,
    /// Owner; `None` only when questions are created without authentication
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new question
#[derive(Debug, Clone)]
pub struct CreateQuestion {
    pub question: String,
    pub detail: String,
    pub user_id: Option<Uuid>,
}

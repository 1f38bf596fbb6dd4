use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for answer
#[derive(Debug, Clone, FromRow)]
pub struct Answer {
    pub id: i64,
    pub answer: String,
    pub user_id: Uuid,
    pub question_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

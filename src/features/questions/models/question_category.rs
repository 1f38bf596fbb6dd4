use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the question/category junction table
///
/// At most one row exists per `(question_id, category_id)` pair.
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct QuestionCategory {
    pub id: Uuid,
    pub question_id: i64,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for category
///
/// `name` is unique and compared exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

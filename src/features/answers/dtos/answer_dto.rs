use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::answers::models::Answer;

/// Response DTO for answer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerResponseDto {
    pub id: i64,
    pub answer: String,
    pub user_id: Uuid,
    pub question_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Answer> for AnswerResponseDto {
    fn from(a: Answer) -> Self {
        Self {
            id: a.id,
            answer: a.answer,
            user_id: a.user_id,
            question_id: a.question_id,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Request DTO for creating or replacing an answer
///
/// The author is always the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAnswerDto {
    #[validate(length(min = 1, max = 10000, message = "Answer must be 1-10000 characters"))]
    pub answer: String,

    #[validate(range(min = 1, message = "Question ID must be positive"))]
    pub question_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    #[test]
    fn test_create_answer_validation() {
        let valid = CreateAnswerDto {
            answer: Sentence(3..8).fake(),
            question_id: 1,
        };
        assert!(valid.validate().is_ok());

        let empty = CreateAnswerDto {
            answer: String::new(),
            question_id: 1,
        };
        assert!(empty.validate().is_err());

        let bad_question = CreateAnswerDto {
            answer: Sentence(3..8).fake(),
            question_id: 0,
        };
        assert!(bad_question.validate().is_err());
    }
}

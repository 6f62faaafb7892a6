use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct QuestionAnswerInput {
    #[validate(length(min = 1, max = 64))]
    pub question_id: String, // q1, q2, ...

    #[validate(length(min = 1, max = 8))]
    pub selected_answer: String, // option key, compared case-sensitively
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SubmitQuizAttemptRequest {
    #[validate(nested)]
    pub answers: Vec<QuestionAnswerInput>,

    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 0))]
    pub offset: Option<i64>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            offset: Some(0),
            limit: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::quiz_question::OptionKey;

/// One learner's graded submission. Never updated once stored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub chapter_id: String,
    pub attempt_number: i32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub results: Vec<QuestionResult>,
    pub correct_count: i32,
    pub total_questions: i32,
    pub score_percentage: i32,
    pub passed: bool,
    pub time_taken_seconds: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub selected_answer: String,
    pub correct_answer: Option<OptionKey>,
    pub is_correct: bool,
    pub explanation: String,
}

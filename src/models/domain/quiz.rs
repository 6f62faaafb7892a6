use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::quiz_question::QuizQuestion;

pub const DEFAULT_PASSING_PERCENTAGE: i32 = 70;
pub const DESCRIPTION_MAX_CHARS: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,         // Assigned on first import, kept across re-imports
    pub chapter_id: String, // Natural key for upserts
    pub title: String,
    pub description: String,
    pub passing_percentage: i32,
    pub questions: Vec<QuizQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(
        chapter_id: &str,
        title: &str,
        description: &str,
        passing_percentage: i32,
        questions: Vec<QuizQuestion>,
    ) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            chapter_id: chapter_id.to_string(),
            title: title.to_string(),
            description: truncate_chars(description, DESCRIPTION_MAX_CHARS),
            passing_percentage,
            questions,
            created_at: Some(now),
            modified_at: Some(now),
        }
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.id.as_str())
    }
}

/// Cuts `text` to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

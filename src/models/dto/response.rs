use serde::Serialize;

use crate::models::domain::{Quiz, QuizOption, QuizQuestion};

/// Quiz as shown to learners: no answer key, no explanations.
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuizDto {
    pub id: String,
    pub chapter_id: String,
    pub title: String,
    pub description: String,
    pub passing_percentage: i32,
    pub questions: Vec<PublicQuestionDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestionDto {
    pub id: String,
    pub text: String,
    pub options: Vec<QuizOption>,
}

impl From<QuizQuestion> for PublicQuestionDto {
    fn from(question: QuizQuestion) -> Self {
        PublicQuestionDto {
            id: question.id,
            text: question.text,
            options: question.options,
        }
    }
}

impl From<Quiz> for PublicQuizDto {
    fn from(quiz: Quiz) -> Self {
        PublicQuizDto {
            id: quiz.id,
            chapter_id: quiz.chapter_id,
            title: quiz.title,
            description: quiz.description,
            passing_percentage: quiz.passing_percentage,
            questions: quiz
                .questions
                .into_iter()
                .map(PublicQuestionDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSummaryDto {
    pub id: String,
    pub chapter_id: String,
    pub title: String,
    pub description: String,
    pub passing_percentage: i32,
    pub question_count: usize,
}

impl From<Quiz> for QuizSummaryDto {
    fn from(quiz: Quiz) -> Self {
        QuizSummaryDto {
            question_count: quiz.questions.len(),
            id: quiz.id,
            chapter_id: quiz.chapter_id,
            title: quiz.title,
            description: quiz.description,
            passing_percentage: quiz.passing_percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

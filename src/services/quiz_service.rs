use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::Quiz,
        dto::{request::PaginationParams, response::PaginatedResponse, response::QuizSummaryDto},
    },
    parser::ParsedQuiz,
    repositories::QuizRepository,
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_quiz_by_chapter(&self, chapter_id: &str) -> AppResult<Quiz> {
        self.repository
            .find_by_chapter_id(chapter_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz for chapter '{}' not found", chapter_id))
            })
    }

    pub async fn list_quizzes(
        &self,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResponse<QuizSummaryDto>> {
        let (offset, limit) = (pagination.offset(), pagination.limit());
        let (quizzes, total) = self.repository.list_quizzes(offset, limit).await?;

        Ok(PaginatedResponse {
            items: quizzes.into_iter().map(QuizSummaryDto::from).collect(),
            total,
            offset,
            limit,
        })
    }

    /// Stores a freshly parsed quiz, replacing the content of any quiz with the same chapter.
    pub async fn upsert_parsed(&self, parsed: ParsedQuiz) -> AppResult<Quiz> {
        let chapter_id = parsed.chapter_id.clone();
        let quiz = self.repository.upsert_by_chapter_id(parsed.into_quiz()).await?;

        log::info!(
            "Upserted quiz '{}' ({} questions) as {}",
            chapter_id,
            quiz.questions.len(),
            quiz.id
        );
        Ok(quiz)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

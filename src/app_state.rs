use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoQuizAttemptRepository, MongoQuizRepository, QuizAttemptRepository, QuizRepository,
    },
    services::{
        quiz_attempt_service::{QuizAttemptService, SubmissionPolicy},
        quiz_service::QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub attempt_service: Arc<QuizAttemptService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        Ok(Self::with_repositories(
            config,
            quiz_repository,
            attempt_repository,
        ))
    }

    pub fn with_repositories(
        config: Config,
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
    ) -> Self {
        let quiz_service = Arc::new(QuizService::new(quiz_repository.clone()));
        let attempt_service = Arc::new(QuizAttemptService::new(
            quiz_repository,
            attempt_repository,
            SubmissionPolicy::from_flag(config.reject_unknown_answers),
        ));

        Self {
            quiz_service,
            attempt_service,
            config: Arc::new(config),
        }
    }
}

//! Walks the content directory, parses every quiz document and upserts the
//! results into MongoDB.

use std::process::ExitCode;
use std::sync::Arc;

use chapter_quiz_server::{
    config::Config,
    db::Database,
    errors::AppResult,
    parser::{ParserOptions, QuizParser},
    repositories::MongoQuizRepository,
    services::{
        quiz_import_service::{ImportReport, QuizImportService},
        quiz_service::QuizService,
    },
};

async fn run() -> AppResult<ImportReport> {
    let config = Config::from_env();
    config.validate()?;

    let db = Database::connect(&config).await?;
    log::info!("Importing quizzes into database '{}'", db.db_name());

    let repository = MongoQuizRepository::new(&db);
    repository.ensure_indexes().await?;

    let quiz_service = Arc::new(QuizService::new(Arc::new(repository)));
    let importer = QuizImportService::new(
        quiz_service,
        QuizParser::new(ParserOptions::from_config(&config)),
    );

    importer.import_directory(&config.content_dir).await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match run().await {
        Ok(report) => {
            log::info!(
                "Imported {} quizzes ({} documents without questions, {} unreadable, {} warnings)",
                report.imported.len(),
                report.no_quiz.len(),
                report.unreadable.len(),
                report.warnings
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Quiz import failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

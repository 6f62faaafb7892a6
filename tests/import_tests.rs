mod common;

use std::{fs, path::Path, sync::Arc};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use chapter_quiz_server::{
    errors::AppError,
    models::domain::OptionKey,
    parser::{ParserOptions, QuizParser},
    repositories::QuizRepository,
    services::{quiz_import_service::QuizImportService, quiz_service::QuizService},
};

use common::{FailingQuizRepository, InMemoryQuizRepository, SAMPLE_QUIZ};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, contents).expect("write file");
}

fn importer(repository: Arc<dyn QuizRepository>) -> QuizImportService {
    QuizImportService::new(
        Arc::new(QuizService::new(repository)),
        QuizParser::new(ParserOptions::default()),
    )
}

#[tokio::test]
async fn imports_every_quiz_in_the_tree() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "chapter-1/quiz.md", SAMPLE_QUIZ);
    write(
        dir.path(),
        "chapter-2/quiz.md",
        "# Chapter 2 Quiz\n\n### Question 1\nPick C\nA) one\nB) two\nC) three\nAnswer: C\n",
    );
    write(dir.path(), "chapter-2/overview.md", "# Not a quiz");
    write(dir.path(), "chapter-3/quiz.md", "# Chapter 3 Quiz\n\nComing soon.\n");

    let repository = Arc::new(InMemoryQuizRepository::new());
    let report = importer(repository.clone())
        .import_directory(dir.path())
        .await
        .expect("import should succeed");

    assert_eq!(
        report.imported,
        vec!["chapter-1-quiz".to_string(), "chapter-2-quiz".to_string()]
    );
    assert_eq!(report.no_quiz, vec![dir.path().join("chapter-3/quiz.md")]);
    assert!(report.unreadable.is_empty());

    let stored = repository
        .find_by_chapter_id("chapter-2-quiz")
        .await
        .expect("lookup")
        .expect("quiz stored");
    assert_eq!(stored.questions.len(), 1);
    assert_eq!(stored.questions[0].correct_answer, Some(OptionKey::C));
}

#[tokio::test]
async fn reimport_updates_content_in_place() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "chapter-1/quiz.md", SAMPLE_QUIZ);

    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = importer(repository.clone());
    service
        .import_directory(dir.path())
        .await
        .expect("first import");
    let first = repository
        .find_by_chapter_id("chapter-1-quiz")
        .await
        .expect("lookup")
        .expect("stored");

    write(
        dir.path(),
        "chapter-1/quiz.md",
        &SAMPLE_QUIZ.replace("**Answer: B)**", "**Answer: A)**"),
    );
    service
        .import_directory(dir.path())
        .await
        .expect("second import");
    let second = repository
        .find_by_chapter_id("chapter-1-quiz")
        .await
        .expect("lookup")
        .expect("stored");

    assert_eq!(first.id, second.id);
    assert_eq!(second.questions[0].correct_answer, Some(OptionKey::A));
}

#[tokio::test]
async fn unreadable_document_is_reported_and_skipped() {
    let dir = TempDir::new().expect("temp dir");
    let broken = dir.path().join("chapter-1/quiz.md");
    fs::create_dir_all(dir.path().join("chapter-1")).expect("create dirs");
    fs::write(&broken, [0x23, 0x20, 0xff, 0xfe, 0x0a]).expect("write bytes");
    write(dir.path(), "chapter-2/quiz.md", SAMPLE_QUIZ);

    let repository = Arc::new(InMemoryQuizRepository::new());
    let report = importer(repository.clone())
        .import_directory(dir.path())
        .await
        .expect("import should continue past the bad file");

    assert_eq!(report.unreadable, vec![broken]);
    assert_eq!(report.imported, vec!["chapter-2-quiz".to_string()]);
    assert!(repository
        .find_by_chapter_id("chapter-1-quiz")
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn storage_failure_stops_the_import() {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "chapter-1/quiz.md", SAMPLE_QUIZ);

    let result = importer(Arc::new(FailingQuizRepository))
        .import_directory(dir.path())
        .await;

    assert!(matches!(result, Err(AppError::DatabaseError(_))));
}

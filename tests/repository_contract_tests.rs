mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

use chapter_quiz_server::{
    errors::AppError,
    models::{
        domain::{OptionKey, Quiz, QuizOption, QuizQuestion},
        dto::request::{PaginationParams, QuestionAnswerInput, SubmitQuizAttemptRequest},
    },
    repositories::{QuizAttemptRepository, QuizRepository},
    services::quiz_attempt_service::{QuizAttemptService, SubmissionPolicy},
};

use common::{InMemoryQuizAttemptRepository, InMemoryQuizRepository};

fn question(n: usize, key: OptionKey) -> QuizQuestion {
    QuizQuestion {
        id: format!("q{}", n),
        text: format!("Question {}", n),
        options: [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D]
            .into_iter()
            .map(|key| QuizOption {
                key,
                text: format!("option {}", key),
            })
            .collect(),
        correct_answer: Some(key),
        explanation: format!("Because of {}", key),
    }
}

fn quiz(chapter_id: &str, keys: &[OptionKey]) -> Quiz {
    Quiz::new(
        chapter_id,
        &format!("{} title", chapter_id),
        "",
        70,
        keys.iter()
            .enumerate()
            .map(|(i, key)| question(i + 1, *key))
            .collect(),
    )
}

fn submission(answers: &[(&str, &str)]) -> SubmitQuizAttemptRequest {
    SubmitQuizAttemptRequest {
        answers: answers
            .iter()
            .map(|(question_id, selected_answer)| QuestionAnswerInput {
                question_id: question_id.to_string(),
                selected_answer: selected_answer.to_string(),
            })
            .collect(),
        started_at: Utc::now() - Duration::seconds(90),
    }
}

async fn service_with(quiz: Quiz) -> (QuizAttemptService, Arc<InMemoryQuizAttemptRepository>) {
    let quizzes = Arc::new(InMemoryQuizRepository::new());
    quizzes
        .upsert_by_chapter_id(quiz)
        .await
        .expect("seed quiz");
    let attempts = Arc::new(InMemoryQuizAttemptRepository::new());

    let service = QuizAttemptService::new(quizzes, attempts.clone(), SubmissionPolicy::Strict);
    (service, attempts)
}

#[tokio::test]
async fn upsert_keeps_identity_across_reimports() {
    let repo = InMemoryQuizRepository::new();

    let first = repo
        .upsert_by_chapter_id(quiz("chapter-1-quiz", &[OptionKey::A]))
        .await
        .expect("first upsert");
    let second = repo
        .upsert_by_chapter_id(quiz("chapter-1-quiz", &[OptionKey::B, OptionKey::C]))
        .await
        .expect("second upsert");

    assert_eq!(first.id, second.id);
    assert_eq!(second.questions.len(), 2);

    let (items, total) = repo.list_quizzes(0, 10).await.expect("list");
    assert_eq!(total, 1);
    assert_eq!(items[0].questions[0].correct_answer, Some(OptionKey::B));
}

#[tokio::test]
async fn attempt_numbers_are_per_learner_and_quiz() {
    let repo = InMemoryQuizAttemptRepository::new();

    assert_eq!(repo.next_attempt_number("u1", "quiz-a").await.ok(), Some(1));
    assert_eq!(repo.next_attempt_number("u1", "quiz-a").await.ok(), Some(2));
    assert_eq!(repo.next_attempt_number("u2", "quiz-a").await.ok(), Some(1));
    assert_eq!(repo.next_attempt_number("u1", "quiz-b").await.ok(), Some(1));
}

#[tokio::test]
async fn full_and_zero_scores() {
    let keys = [OptionKey::A, OptionKey::B, OptionKey::C];
    let (service, _) = service_with(quiz("chapter-2-quiz", &keys)).await;

    let perfect = service
        .submit_attempt(
            "learner",
            "chapter-2-quiz",
            submission(&[("q1", "A"), ("q2", "B"), ("q3", "C")]),
        )
        .await
        .expect("perfect submission");
    assert_eq!(perfect.score_percentage, 100);
    assert_eq!(perfect.correct_count, 3);
    assert!(perfect.passed);
    assert!(perfect.time_taken_seconds >= 90);

    let wrong = service
        .submit_attempt(
            "learner",
            "chapter-2-quiz",
            submission(&[("q1", "D"), ("q2", "D"), ("q3", "D")]),
        )
        .await
        .expect("wrong submission");
    assert_eq!(wrong.score_percentage, 0);
    assert!(!wrong.passed);
    assert_eq!(wrong.attempt_number, 2);
    assert!(wrong.results.iter().all(|r| !r.is_correct));
}

#[tokio::test]
async fn rejected_submission_consumes_no_attempt_number() {
    let (service, attempts) = service_with(quiz("chapter-3-quiz", &[OptionKey::A])).await;

    let err = service
        .submit_attempt("learner", "chapter-3-quiz", submission(&[("q9", "A")]))
        .await
        .expect_err("unknown question should be rejected");
    assert!(matches!(err, AppError::InvalidSubmission(_)));
    assert_eq!(attempts.len().await, 0);

    let attempt = service
        .submit_attempt("learner", "chapter-3-quiz", submission(&[("q1", "A")]))
        .await
        .expect("valid submission");
    assert_eq!(attempt.attempt_number, 1);
}

#[tokio::test]
async fn concurrent_submissions_get_distinct_attempt_numbers() {
    let (service, attempts) = service_with(quiz("chapter-4-quiz", &[OptionKey::B])).await;
    let service = Arc::new(service);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .submit_attempt("learner", "chapter-4-quiz", submission(&[("q1", "B")]))
                    .await
            })
        })
        .collect();

    let mut numbers = Vec::new();
    for handle in handles {
        let attempt = handle.await.expect("task").expect("submission");
        numbers.push(attempt.attempt_number);
    }
    numbers.sort_unstable();

    assert_eq!(numbers, (1..=16).collect::<Vec<_>>());
    assert_eq!(attempts.len().await, 16);
}

#[tokio::test]
async fn lost_counter_resumes_after_stored_attempts() {
    let (service, attempts) = service_with(quiz("chapter-6-quiz", &[OptionKey::A])).await;

    for _ in 0..2 {
        service
            .submit_attempt("learner", "chapter-6-quiz", submission(&[("q1", "A")]))
            .await
            .expect("submission");
    }
    attempts.clear_counters().await;

    let attempt = service
        .submit_attempt("learner", "chapter-6-quiz", submission(&[("q1", "A")]))
        .await
        .expect("submission after counter loss");

    assert_eq!(attempt.attempt_number, 3);
    assert_eq!(attempts.len().await, 3);
}

#[tokio::test]
async fn attempts_are_listed_newest_first() {
    let (service, _) = service_with(quiz("chapter-5-quiz", &[OptionKey::C])).await;

    for answer in ["A", "C", "B"] {
        service
            .submit_attempt("learner", "chapter-5-quiz", submission(&[("q1", answer)]))
            .await
            .expect("submission");
    }
    service
        .submit_attempt("someone-else", "chapter-5-quiz", submission(&[("q1", "C")]))
        .await
        .expect("other learner");

    let page = service
        .list_attempts(
            "learner",
            "chapter-5-quiz",
            &PaginationParams {
                offset: Some(0),
                limit: Some(2),
            },
        )
        .await
        .expect("list");

    assert_eq!(page.total, 3);
    let numbers: Vec<_> = page.items.iter().map(|a| a.attempt_number).collect();
    assert_eq!(numbers, vec![3, 2]);
}

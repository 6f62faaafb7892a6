#![allow(dead_code)]

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::RwLock;

use chapter_quiz_server::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizAttempt},
    repositories::{QuizAttemptRepository, QuizRepository},
};

pub const SAMPLE_QUIZ: &str = "# Chapter Quiz

Check what you learned about ROS 2.

### Question 1: Topic

**What is ROS 2?**

A) x
B) y

**Answer: B)**
";

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: SecretString::from("mongodb://localhost:27017".to_string()),
        mongo_db_name: "chapter-quiz-test".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        cors_allowed_origin: None,
        content_dir: PathBuf::from("docs"),
        chapter_prefix: "chapter-".to_string(),
        passing_percentage: 70,
        reject_unknown_answers: true,
    }
}

fn page<T: Clone>(items: &[T], offset: i64, limit: i64) -> Vec<T> {
    let start = offset.max(0) as usize;
    if start >= items.len() {
        return vec![];
    }
    let end = (start + limit.max(0) as usize).min(items.len());
    items[start..end].to_vec()
}

// Quizzes keyed by chapter id
#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_by_chapter_id(&self, chapter_id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(chapter_id).cloned())
    }

    async fn list_quizzes(&self, offset: i64, limit: i64) -> AppResult<(Vec<Quiz>, i64)> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes.values().cloned().collect();
        items.sort_by(|a, b| a.chapter_id.cmp(&b.chapter_id));

        Ok((page(&items, offset, limit), items.len() as i64))
    }

    async fn upsert_by_chapter_id(&self, mut quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if let Some(existing) = quizzes.get(&quiz.chapter_id) {
            quiz.id = existing.id.clone();
            quiz.created_at = existing.created_at;
        }
        quiz.modified_at = Some(Utc::now());
        quizzes.insert(quiz.chapter_id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizAttemptRepository {
    attempts: Arc<RwLock<Vec<QuizAttempt>>>,
    counters: Arc<RwLock<HashMap<(String, String), i32>>>,
}

impl InMemoryQuizAttemptRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.attempts.read().await.len()
    }

    /// Drops every counter, as when the counter collection is lost.
    pub async fn clear_counters(&self) {
        self.counters.write().await.clear();
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        let taken = attempts.iter().any(|a| {
            a.user_id == attempt.user_id
                && a.quiz_id == attempt.quiz_id
                && a.attempt_number == attempt.attempt_number
        });
        if taken {
            return Err(AppError::AlreadyExists(format!(
                "Attempt {} for user '{}' on quiz '{}' already exists",
                attempt.attempt_number, attempt.user_id, attempt.quiz_id
            )));
        }
        attempts.push(attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts.iter().find(|a| a.id == id).cloned())
    }

    async fn next_attempt_number(&self, user_id: &str, quiz_id: &str) -> AppResult<i32> {
        let mut counters = self.counters.write().await;
        let key = (user_id.to_string(), quiz_id.to_string());
        if !counters.contains_key(&key) {
            let attempts = self.attempts.read().await;
            let highest = attempts
                .iter()
                .filter(|a| a.user_id == user_id && a.quiz_id == quiz_id)
                .map(|a| a.attempt_number)
                .max()
                .unwrap_or(0);
            counters.insert(key.clone(), highest);
        }
        let seq = counters.entry(key).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }

    async fn list_user_attempts(
        &self,
        user_id: &str,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let attempts = self.attempts.read().await;
        let mut items: Vec<_> = attempts
            .iter()
            .filter(|a| a.user_id == user_id && a.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.attempt_number.cmp(&a.attempt_number));

        Ok((page(&items, offset, limit), items.len() as i64))
    }
}

/// Repository whose every call fails, for exercising error paths.
pub struct FailingQuizRepository;

#[async_trait]
impl QuizRepository for FailingQuizRepository {
    async fn find_by_chapter_id(&self, _chapter_id: &str) -> AppResult<Option<Quiz>> {
        Err(AppError::DatabaseError("unavailable".to_string()))
    }

    async fn list_quizzes(&self, _offset: i64, _limit: i64) -> AppResult<(Vec<Quiz>, i64)> {
        Err(AppError::DatabaseError("unavailable".to_string()))
    }

    async fn upsert_by_chapter_id(&self, _quiz: Quiz) -> AppResult<Quiz> {
        Err(AppError::DatabaseError("unavailable".to_string()))
    }

    async fn ping(&self) -> AppResult<()> {
        Err(AppError::DatabaseError("unavailable".to_string()))
    }
}

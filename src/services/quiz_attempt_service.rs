use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{QuestionResult, Quiz, QuizAttempt};
use crate::models::dto::request::{
    PaginationParams, QuestionAnswerInput, SubmitQuizAttemptRequest,
};
use crate::models::dto::response::PaginatedResponse;
use crate::repositories::{QuizAttemptRepository, QuizRepository};

/// How to treat answers for question ids the quiz does not have.
/// Missing and duplicated answers are always rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionPolicy {
    Strict,
    AllowUnknown,
}

impl SubmissionPolicy {
    pub fn from_flag(reject_unknown_answers: bool) -> Self {
        if reject_unknown_answers {
            SubmissionPolicy::Strict
        } else {
            SubmissionPolicy::AllowUnknown
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradedSubmission {
    pub results: Vec<QuestionResult>,
    pub correct_count: i32,
    pub total_questions: i32,
    pub score_percentage: i32,
    pub passed: bool,
}

/// Percentage rounded half up: 1 of 8 is 13, 1 of 3 is 33, 2 of 3 is 67.
pub fn score_percentage(correct: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as i32
}

pub fn time_taken_seconds(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> i64 {
    (completed_at - started_at).num_seconds().max(0)
}

pub struct QuizAttemptService {
    quiz_repository: Arc<dyn QuizRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
    policy: SubmissionPolicy,
}

impl QuizAttemptService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
        policy: SubmissionPolicy,
    ) -> Self {
        Self {
            quiz_repository,
            attempt_repository,
            policy,
        }
    }

    /// Grade submitted answers against the quiz's answer key
    pub fn grade_attempt(
        quiz: &Quiz,
        submitted_answers: &[QuestionAnswerInput],
        policy: SubmissionPolicy,
    ) -> AppResult<GradedSubmission> {
        if quiz.questions.is_empty() {
            return Err(AppError::InvalidSubmission(format!(
                "Quiz '{}' has no questions",
                quiz.chapter_id
            )));
        }

        let mut answers: HashMap<&str, &str> = HashMap::with_capacity(submitted_answers.len());
        for answer in submitted_answers {
            let previous = answers.insert(
                answer.question_id.as_str(),
                answer.selected_answer.as_str(),
            );
            if previous.is_some() {
                return Err(AppError::InvalidSubmission(format!(
                    "Question '{}' was answered more than once",
                    answer.question_id
                )));
            }
        }

        let known: HashSet<&str> = quiz.question_ids().collect();

        let missing: Vec<&str> = quiz
            .question_ids()
            .filter(|id| !answers.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::InvalidSubmission(format!(
                "Missing answers for questions: {}",
                missing.join(", ")
            )));
        }

        if policy == SubmissionPolicy::Strict {
            let mut unknown: Vec<&str> = answers
                .keys()
                .copied()
                .filter(|id| !known.contains(id))
                .collect();
            if !unknown.is_empty() {
                unknown.sort_unstable();
                return Err(AppError::InvalidSubmission(format!(
                    "Answers given for unknown questions: {}",
                    unknown.join(", ")
                )));
            }
        }

        let results: Vec<QuestionResult> = quiz
            .questions
            .iter()
            .map(|question| {
                // Presence checked above
                let selected = answers.get(question.id.as_str()).copied().unwrap_or_default();
                let is_correct = question
                    .correct_answer
                    .map(|key| key.as_str() == selected)
                    .unwrap_or(false);

                QuestionResult {
                    question_id: question.id.clone(),
                    selected_answer: selected.to_string(),
                    correct_answer: question.correct_answer,
                    is_correct,
                    explanation: question.explanation.clone(),
                }
            })
            .collect();

        let correct_count = results.iter().filter(|r| r.is_correct).count();
        let total_questions = results.len();
        let score_percentage = score_percentage(correct_count, total_questions);

        Ok(GradedSubmission {
            correct_count: correct_count as i32,
            total_questions: total_questions as i32,
            score_percentage,
            passed: score_percentage >= quiz.passing_percentage,
            results,
        })
    }

    /// Create a new quiz attempt from grading results
    pub fn create_attempt(
        user_id: &str,
        quiz: &Quiz,
        attempt_number: i32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        graded: GradedSubmission,
    ) -> QuizAttempt {
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            quiz_id: quiz.id.clone(),
            chapter_id: quiz.chapter_id.clone(),
            attempt_number,
            started_at,
            completed_at,
            results: graded.results,
            correct_count: graded.correct_count,
            total_questions: graded.total_questions,
            score_percentage: graded.score_percentage,
            passed: graded.passed,
            time_taken_seconds: time_taken_seconds(started_at, completed_at),
        }
    }

    /// Grades and stores one submission. Nothing is written unless grading succeeds.
    pub async fn submit_attempt(
        &self,
        user_id: &str,
        chapter_id: &str,
        request: SubmitQuizAttemptRequest,
    ) -> AppResult<QuizAttempt> {
        request.validate()?;

        let quiz = self
            .quiz_repository
            .find_by_chapter_id(chapter_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz for chapter '{}' not found", chapter_id))
            })?;

        let graded = Self::grade_attempt(&quiz, &request.answers, self.policy)?;
        let completed_at = Utc::now();

        let attempt_number = self
            .attempt_repository
            .next_attempt_number(user_id, &quiz.id)
            .await?;

        let attempt = Self::create_attempt(
            user_id,
            &quiz,
            attempt_number,
            request.started_at,
            completed_at,
            graded,
        );
        let attempt = self.attempt_repository.create(attempt).await?;

        log::info!(
            "User '{}' scored {}% on '{}' (attempt {}, passed: {})",
            user_id,
            attempt.score_percentage,
            chapter_id,
            attempt.attempt_number,
            attempt.passed
        );
        Ok(attempt)
    }

    pub async fn list_attempts(
        &self,
        user_id: &str,
        chapter_id: &str,
        pagination: &PaginationParams,
    ) -> AppResult<PaginatedResponse<QuizAttempt>> {
        let quiz = self
            .quiz_repository
            .find_by_chapter_id(chapter_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Quiz for chapter '{}' not found", chapter_id))
            })?;

        let (offset, limit) = (pagination.offset(), pagination.limit());
        let (items, total) = self
            .attempt_repository
            .list_user_attempts(user_id, &quiz.id, offset, limit)
            .await?;

        Ok(PaginatedResponse {
            items,
            total,
            offset,
            limit,
        })
    }

    /// A learner can only read their own attempts; others look missing.
    pub async fn get_attempt(&self, user_id: &str, attempt_id: &str) -> AppResult<QuizAttempt> {
        self.attempt_repository
            .find_by_id(attempt_id)
            .await?
            .filter(|attempt| attempt.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Attempt '{}' not found", attempt_id)))
    }
}

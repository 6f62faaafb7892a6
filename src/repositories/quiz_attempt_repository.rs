use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::QuizAttempt,
};

const DUPLICATE_KEY: i32 = 11000;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>>;
    /// Hands out the next attempt number for a learner on a quiz. Atomic and strictly
    /// increasing; a number is never handed out twice, even after attempts are deleted.
    async fn next_attempt_number(&self, user_id: &str, quiz_id: &str) -> AppResult<i32>;
    async fn list_user_attempts(
        &self,
        user_id: &str,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)>;
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct AttemptCounter {
    #[serde(rename = "_id")]
    id: String,
    user_id: String,
    quiz_id: String,
    seq: i32,
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
    counters: Collection<AttemptCounter>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection("quiz_attempts"),
            counters: db.get_collection("quiz_attempt_counters"),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let attempt_number_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1, "attempt_number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_quiz_attempt_number_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(attempt_number_index).await?;

        log::info!("Successfully created indexes for quiz_attempts collection");
        Ok(())
    }

    async fn bump_counter(&self, key: &str) -> AppResult<Option<AttemptCounter>> {
        let counter = self
            .counters
            .find_one_and_update(doc! { "_id": key }, doc! { "$inc": { "seq": 1 } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(counter)
    }
}

/// Value a fresh counter starts from: the highest attempt number already stored.
fn counter_seed(latest: Option<&QuizAttempt>) -> i32 {
    latest.map_or(0, |attempt| attempt.attempt_number.max(0))
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        match self.collection.insert_one(&attempt).await {
            Ok(_) => Ok(attempt),
            Err(err) if is_duplicate_key(&err) => Err(AppError::AlreadyExists(format!(
                "Attempt {} for user '{}' on quiz '{}' already exists",
                attempt.attempt_number, attempt.user_id, attempt.quiz_id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizAttempt>> {
        let attempt = self.collection.find_one(doc! { "id": id }).await?;
        Ok(attempt)
    }

    async fn next_attempt_number(&self, user_id: &str, quiz_id: &str) -> AppResult<i32> {
        let key = format!("{}:{}", user_id, quiz_id);

        if let Some(counter) = self.bump_counter(&key).await? {
            return Ok(counter.seq);
        }

        // First use, or the counter was lost: continue after any stored attempts.
        let latest = self
            .collection
            .find_one(doc! { "user_id": user_id, "quiz_id": quiz_id })
            .sort(doc! { "attempt_number": -1 })
            .await?;
        let seed = counter_seed(latest.as_ref());

        let seeded = self
            .counters
            .update_one(
                doc! { "_id": &key },
                doc! {
                    "$max": { "seq": seed },
                    "$setOnInsert": { "user_id": user_id, "quiz_id": quiz_id },
                },
            )
            .upsert(true)
            .await;
        match seeded {
            Ok(_) => {}
            // A concurrent request created it first
            Err(err) if is_duplicate_key(&err) => {}
            Err(err) => return Err(err.into()),
        }

        let counter = self.bump_counter(&key).await?.ok_or_else(|| {
            AppError::InternalError(format!("Attempt counter '{}' was not created", key))
        })?;

        Ok(counter.seq)
    }

    async fn list_user_attempts(
        &self,
        user_id: &str,
        quiz_id: &str,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<QuizAttempt>, i64)> {
        let filter = doc! { "user_id": user_id, "quiz_id": quiz_id };

        let total = self.collection.count_documents(filter.clone()).await?;

        let attempts = self
            .collection
            .find(filter)
            .sort(doc! { "attempt_number": -1 })
            .skip(offset.max(0) as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((attempts, total as i64))
    }
}

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn find_by_chapter_id(&self, chapter_id: &str) -> AppResult<Option<Quiz>>;
    async fn list_quizzes(&self, offset: i64, limit: i64) -> AppResult<(Vec<Quiz>, i64)>;
    /// Replaces content of the quiz with the same chapter id, keeping its `id` and
    /// `created_at`; inserts `quiz` as-is when the chapter is new.
    async fn upsert_by_chapter_id(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn ping(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    db: Database,
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self {
            db: db.clone(),
            collection,
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let chapter_index = IndexModel::builder()
            .keys(doc! { "chapter_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("chapter_id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(chapter_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_by_chapter_id(&self, chapter_id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one(doc! { "chapter_id": chapter_id })
            .await?;
        Ok(quiz)
    }

    async fn list_quizzes(&self, offset: i64, limit: i64) -> AppResult<(Vec<Quiz>, i64)> {
        let total = self.collection.count_documents(doc! {}).await? as i64;

        let items: Vec<Quiz> = self
            .collection
            .find(doc! {})
            .sort(doc! { "chapter_id": 1 })
            .skip(offset.max(0) as u64)
            .limit(limit)
            .await?
            .try_collect()
            .await?;

        Ok((items, total))
    }

    async fn upsert_by_chapter_id(&self, quiz: Quiz) -> AppResult<Quiz> {
        let now = Utc::now();
        let update = doc! {
            "$set": {
                "title": &quiz.title,
                "description": &quiz.description,
                "passing_percentage": quiz.passing_percentage,
                "questions": to_bson(&quiz.questions)?,
                "modified_at": to_bson(&now)?,
            },
            "$setOnInsert": {
                "id": &quiz.id,
                "created_at": to_bson(&quiz.created_at.unwrap_or(now))?,
            },
        };

        let stored = self
            .collection
            .find_one_and_update(doc! { "chapter_id": &quiz.chapter_id }, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Upsert of quiz '{}' returned no document",
                    quiz.chapter_id
                ))
            })?;

        Ok(stored)
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.ping().await
    }
}

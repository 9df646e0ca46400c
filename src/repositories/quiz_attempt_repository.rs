use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::QuizAttempt,
};

#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<QuizAttempt>>;
    /// The single live attempt for this quiz/student pair, if any.
    async fn find_active(
        &self,
        quiz_id: &ObjectId,
        student_id: &ObjectId,
    ) -> AppResult<Option<QuizAttempt>>;
    async fn find_by_quiz(&self, quiz_id: &ObjectId) -> AppResult<Vec<QuizAttempt>>;
    async fn find_by_student(&self, student_id: &ObjectId) -> AppResult<Vec<QuizAttempt>>;
    async fn update(&self, id: &ObjectId, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizAttemptRepository {
    collection: Collection<QuizAttempt>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quiz_attempts");
        Self { collection }
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        self.collection.insert_one(&attempt).await?;
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<QuizAttempt>> {
        let attempt = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(attempt)
    }

    async fn find_active(
        &self,
        quiz_id: &ObjectId,
        student_id: &ObjectId,
    ) -> AppResult<Option<QuizAttempt>> {
        let attempt = self
            .collection
            .find_one(doc! {
                "quiz_id": quiz_id,
                "student_id": student_id,
                "is_active": true,
            })
            .await?;
        Ok(attempt)
    }

    async fn find_by_quiz(&self, quiz_id: &ObjectId) -> AppResult<Vec<QuizAttempt>> {
        let cursor = self
            .collection
            .find(doc! { "quiz_id": quiz_id, "is_active": true })
            .sort(doc! { "started_at": 1 })
            .await?;
        let attempts: Vec<QuizAttempt> = cursor.try_collect().await?;
        Ok(attempts)
    }

    async fn find_by_student(&self, student_id: &ObjectId) -> AppResult<Vec<QuizAttempt>> {
        let cursor = self
            .collection
            .find(doc! { "student_id": student_id, "is_active": true })
            .sort(doc! { "started_at": -1 })
            .await?;
        let attempts: Vec<QuizAttempt> = cursor.try_collect().await?;
        Ok(attempts)
    }

    async fn update(&self, id: &ObjectId, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &attempt)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Quiz attempt with id '{}' not found",
                id
            )));
        }

        Ok(attempt)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "student_id": 1 })
            .build();
        self.collection.create_index(model).await?;
        Ok(())
    }
}

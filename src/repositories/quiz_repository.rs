use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizStatus},
};

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Quiz>>;
    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        status: Option<QuizStatus>,
    ) -> AppResult<Vec<Quiz>>;
    async fn find_published_for_class(&self, class_id: &ObjectId) -> AppResult<Vec<Quiz>>;
    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<Quiz>;
    async fn set_status(&self, id: &ObjectId, status: QuizStatus) -> AppResult<Quiz>;
    /// Soft delete; attempts against the quiz are kept.
    async fn soft_delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("quizzes");
        Self { collection }
    }
}

fn status_str(status: QuizStatus) -> &'static str {
    match status {
        QuizStatus::Draft => "draft",
        QuizStatus::Published => "published",
        QuizStatus::Ongoing => "ongoing",
        QuizStatus::Completed => "completed",
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one(doc! { "_id": id, "is_active": true })
            .await?;
        Ok(quiz)
    }

    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        status: Option<QuizStatus>,
    ) -> AppResult<Vec<Quiz>> {
        let mut filter = doc! { "is_active": true };
        if let Some(class_id) = class_id {
            filter.insert("class_id", class_id);
        }
        if let Some(status) = status {
            filter.insert("status", status_str(status));
        }

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "quiz_date": -1 })
            .await?;
        let quizzes: Vec<Quiz> = cursor.try_collect().await?;
        Ok(quizzes)
    }

    async fn find_published_for_class(&self, class_id: &ObjectId) -> AppResult<Vec<Quiz>> {
        let cursor = self
            .collection
            .find(doc! {
                "class_id": class_id,
                "status": { "$in": ["published", "ongoing"] },
                "is_active": true,
            })
            .sort(doc! { "quiz_date": 1 })
            .await?;
        let quizzes: Vec<Quiz> = cursor.try_collect().await?;
        Ok(quizzes)
    }

    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<Quiz> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let quiz = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "is_active": true },
                doc! { "$set": fields },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

        Ok(quiz)
    }

    async fn set_status(&self, id: &ObjectId, status: QuizStatus) -> AppResult<Quiz> {
        self.update_fields(id, doc! { "status": status_str(status) })
            .await
    }

    async fn soft_delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id, "is_active": true },
                doc! { "$set": { "is_active": false } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "class_id": 1, "quiz_date": -1 })
            .build();
        self.collection.create_index(model).await?;
        Ok(())
    }
}

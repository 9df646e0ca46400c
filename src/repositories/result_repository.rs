use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::ExamResult,
};

#[async_trait]
pub trait ResultRepository: Send + Sync {
    async fn create(&self, result: ExamResult) -> AppResult<ExamResult>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<ExamResult>>;
    async fn find_by_student_and_exam(
        &self,
        student_id: &ObjectId,
        exam_id: &ObjectId,
    ) -> AppResult<Option<ExamResult>>;
    /// `published_only` restricts to results released to students.
    async fn find_by_student(
        &self,
        student_id: &ObjectId,
        published_only: bool,
    ) -> AppResult<Vec<ExamResult>>;
    async fn find_by_exam(&self, exam_id: &ObjectId) -> AppResult<Vec<ExamResult>>;
    async fn update(&self, id: &ObjectId, result: ExamResult) -> AppResult<ExamResult>;
    /// Marks every result for the exam published, returning how many changed.
    async fn publish_by_exam(&self, exam_id: &ObjectId) -> AppResult<u64>;
    async fn soft_delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoResultRepository {
    collection: Collection<ExamResult>,
}

impl MongoResultRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("results");
        Self { collection }
    }
}

#[async_trait]
impl ResultRepository for MongoResultRepository {
    async fn create(&self, result: ExamResult) -> AppResult<ExamResult> {
        self.collection.insert_one(&result).await?;
        Ok(result)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<ExamResult>> {
        let result = self
            .collection
            .find_one(doc! { "_id": id, "is_active": true })
            .await?;
        Ok(result)
    }

    async fn find_by_student_and_exam(
        &self,
        student_id: &ObjectId,
        exam_id: &ObjectId,
    ) -> AppResult<Option<ExamResult>> {
        let result = self
            .collection
            .find_one(doc! {
                "student_id": student_id,
                "exam_id": exam_id,
                "is_active": true,
            })
            .await?;
        Ok(result)
    }

    async fn find_by_student(
        &self,
        student_id: &ObjectId,
        published_only: bool,
    ) -> AppResult<Vec<ExamResult>> {
        let mut filter = doc! { "student_id": student_id, "is_active": true };
        if published_only {
            filter.insert("is_published", true);
        }

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;
        let results: Vec<ExamResult> = cursor.try_collect().await?;
        Ok(results)
    }

    async fn find_by_exam(&self, exam_id: &ObjectId) -> AppResult<Vec<ExamResult>> {
        let cursor = self
            .collection
            .find(doc! { "exam_id": exam_id, "is_active": true })
            .sort(doc! { "marks_obtained": -1 })
            .await?;
        let results: Vec<ExamResult> = cursor.try_collect().await?;
        Ok(results)
    }

    async fn update(&self, id: &ObjectId, result: ExamResult) -> AppResult<ExamResult> {
        let update_result = self
            .collection
            .replace_one(doc! { "_id": id }, &result)
            .await?;

        if update_result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Result with id '{}' not found",
                id
            )));
        }

        Ok(result)
    }

    async fn publish_by_exam(&self, exam_id: &ObjectId) -> AppResult<u64> {
        let result = self
            .collection
            .update_many(
                doc! { "exam_id": exam_id, "is_active": true },
                doc! { "$set": { "is_published": true } },
            )
            .await?;
        Ok(result.modified_count)
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
                "Result with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "student_id": 1, "exam_id": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Ensured unique index on results (student_id, exam_id)");

        Ok(())
    }
}

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::AssignmentSubmission,
};

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, submission: AssignmentSubmission) -> AppResult<AssignmentSubmission>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<AssignmentSubmission>>;
    async fn find_active(
        &self,
        assignment_id: &ObjectId,
        student_id: &ObjectId,
    ) -> AppResult<Option<AssignmentSubmission>>;
    async fn find_by_assignment(
        &self,
        assignment_id: &ObjectId,
    ) -> AppResult<Vec<AssignmentSubmission>>;
    async fn find_by_student(&self, student_id: &ObjectId)
        -> AppResult<Vec<AssignmentSubmission>>;
    async fn update(
        &self,
        id: &ObjectId,
        submission: AssignmentSubmission,
    ) -> AppResult<AssignmentSubmission>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<AssignmentSubmission>,
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("assignment_submissions");
        Self { collection }
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn create(&self, submission: AssignmentSubmission) -> AppResult<AssignmentSubmission> {
        self.collection.insert_one(&submission).await?;
        Ok(submission)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<AssignmentSubmission>> {
        let submission = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(submission)
    }

    async fn find_active(
        &self,
        assignment_id: &ObjectId,
        student_id: &ObjectId,
    ) -> AppResult<Option<AssignmentSubmission>> {
        let submission = self
            .collection
            .find_one(doc! {
                "assignment_id": assignment_id,
                "student_id": student_id,
                "is_active": true,
            })
            .await?;
        Ok(submission)
    }

    async fn find_by_assignment(
        &self,
        assignment_id: &ObjectId,
    ) -> AppResult<Vec<AssignmentSubmission>> {
        let cursor = self
            .collection
            .find(doc! { "assignment_id": assignment_id, "is_active": true })
            .sort(doc! { "submitted_at": 1 })
            .await?;
        let submissions: Vec<AssignmentSubmission> = cursor.try_collect().await?;
        Ok(submissions)
    }

    async fn find_by_student(
        &self,
        student_id: &ObjectId,
    ) -> AppResult<Vec<AssignmentSubmission>> {
        let cursor = self
            .collection
            .find(doc! { "student_id": student_id, "is_active": true })
            .sort(doc! { "submitted_at": -1 })
            .await?;
        let submissions: Vec<AssignmentSubmission> = cursor.try_collect().await?;
        Ok(submissions)
    }

    async fn update(
        &self,
        id: &ObjectId,
        submission: AssignmentSubmission,
    ) -> AppResult<AssignmentSubmission> {
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &submission)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Submission with id '{}' not found",
                id
            )));
        }

        Ok(submission)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "assignment_id": 1, "student_id": 1 })
            .build();
        self.collection.create_index(model).await?;
        Ok(())
    }
}

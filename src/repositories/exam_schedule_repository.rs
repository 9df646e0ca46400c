use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{ExamSchedule, ExamStatus},
};

#[async_trait]
pub trait ExamScheduleRepository: Send + Sync {
    async fn create(&self, schedule: ExamSchedule) -> AppResult<ExamSchedule>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<ExamSchedule>>;
    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        status: Option<ExamStatus>,
    ) -> AppResult<Vec<ExamSchedule>>;
    /// Scheduled exams with a date inside `[from, to)`.
    async fn find_in_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ExamSchedule>>;
    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<ExamSchedule>;
    async fn set_status(&self, id: &ObjectId, status: ExamStatus) -> AppResult<ExamSchedule>;
    async fn delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoExamScheduleRepository {
    collection: Collection<ExamSchedule>,
}

impl MongoExamScheduleRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("exam_schedules");
        Self { collection }
    }
}

fn status_str(status: ExamStatus) -> &'static str {
    match status {
        ExamStatus::Scheduled => "scheduled",
        ExamStatus::Ongoing => "ongoing",
        ExamStatus::Completed => "completed",
        ExamStatus::Cancelled => "cancelled",
    }
}

#[async_trait]
impl ExamScheduleRepository for MongoExamScheduleRepository {
    async fn create(&self, schedule: ExamSchedule) -> AppResult<ExamSchedule> {
        self.collection.insert_one(&schedule).await?;
        Ok(schedule)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<ExamSchedule>> {
        let schedule = self
            .collection
            .find_one(doc! { "_id": id, "is_active": true })
            .await?;
        Ok(schedule)
    }

    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        status: Option<ExamStatus>,
    ) -> AppResult<Vec<ExamSchedule>> {
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
            .sort(doc! { "exam_date": 1 })
            .await?;
        let schedules: Vec<ExamSchedule> = cursor.try_collect().await?;
        Ok(schedules)
    }

    async fn find_in_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ExamSchedule>> {
        let filter = doc! {
            "status": status_str(ExamStatus::Scheduled),
            "is_active": true,
            "exam_date": { "$gte": to_bson(&from)?, "$lt": to_bson(&to)? },
        };

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "exam_date": 1 })
            .await?;
        let schedules: Vec<ExamSchedule> = cursor.try_collect().await?;
        Ok(schedules)
    }

    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<ExamSchedule> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let schedule = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "is_active": true },
                doc! { "$set": fields },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Exam schedule with id '{}' not found", id))
            })?;

        Ok(schedule)
    }

    async fn set_status(&self, id: &ObjectId, status: ExamStatus) -> AppResult<ExamSchedule> {
        self.update_fields(id, doc! { "status": status_str(status) })
            .await
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id, "is_active": true },
                doc! { "$set": { "is_active": false } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Exam schedule with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "class_id": 1, "exam_date": 1 })
            .build();
        self.collection.create_index(model).await?;
        Ok(())
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::AttendanceSheet,
};

/// One sheet per class per calendar day; re-marking replaces the sheet.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn upsert(&self, sheet: AttendanceSheet) -> AppResult<AttendanceSheet>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<AttendanceSheet>>;
    async fn find_by_class_and_date(
        &self,
        class_id: &ObjectId,
        date: DateTime<Utc>,
    ) -> AppResult<Option<AttendanceSheet>>;
    async fn find_by_class(
        &self,
        class_id: &ObjectId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<AttendanceSheet>>;
    async fn find_for_student(&self, student_id: &ObjectId) -> AppResult<Vec<AttendanceSheet>>;
    async fn delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoAttendanceRepository {
    collection: Collection<AttendanceSheet>,
}

impl MongoAttendanceRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("attendance");
        Self { collection }
    }
}

#[async_trait]
impl AttendanceRepository for MongoAttendanceRepository {
    async fn upsert(&self, sheet: AttendanceSheet) -> AppResult<AttendanceSheet> {
        let filter = doc! { "class_id": sheet.class_id, "date": to_bson(&sheet.date)? };
        self.collection
            .replace_one(filter, &sheet)
            .upsert(true)
            .await?;
        Ok(sheet)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<AttendanceSheet>> {
        let sheet = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(sheet)
    }

    async fn find_by_class_and_date(
        &self,
        class_id: &ObjectId,
        date: DateTime<Utc>,
    ) -> AppResult<Option<AttendanceSheet>> {
        let sheet = self
            .collection
            .find_one(doc! { "class_id": class_id, "date": to_bson(&date)? })
            .await?;
        Ok(sheet)
    }

    async fn find_by_class(
        &self,
        class_id: &ObjectId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<AttendanceSheet>> {
        let mut filter = doc! { "class_id": class_id };
        let mut range = doc! {};
        if let Some(from) = from {
            range.insert("$gte", to_bson(&from)?);
        }
        if let Some(to) = to {
            range.insert("$lte", to_bson(&to)?);
        }
        if !range.is_empty() {
            filter.insert("date", range);
        }

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "date": -1 })
            .await?;
        let sheets: Vec<AttendanceSheet> = cursor.try_collect().await?;
        Ok(sheets)
    }

    async fn find_for_student(&self, student_id: &ObjectId) -> AppResult<Vec<AttendanceSheet>> {
        let cursor = self
            .collection
            .find(doc! { "attendance_records.student_id": student_id })
            .sort(doc! { "date": -1 })
            .await?;
        let sheets: Vec<AttendanceSheet> = cursor.try_collect().await?;
        Ok(sheets)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Attendance sheet with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "class_id": 1, "date": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Ensured unique index on attendance (class_id, date)");

        Ok(())
    }
}

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
    models::domain::{Assignment, AssignmentStatus},
};

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: Assignment) -> AppResult<Assignment>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Assignment>>;
    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        week_number: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<Assignment>>;
    async fn find_published_for_class(&self, class_id: &ObjectId) -> AppResult<Vec<Assignment>>;
    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<Assignment>;
    async fn set_status(&self, id: &ObjectId, status: AssignmentStatus) -> AppResult<Assignment>;
    async fn soft_delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoAssignmentRepository {
    collection: Collection<Assignment>,
}

impl MongoAssignmentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("assignments");
        Self { collection }
    }
}

fn status_str(status: AssignmentStatus) -> &'static str {
    match status {
        AssignmentStatus::Draft => "draft",
        AssignmentStatus::Published => "published",
        AssignmentStatus::Closed => "closed",
    }
}

#[async_trait]
impl AssignmentRepository for MongoAssignmentRepository {
    async fn create(&self, assignment: Assignment) -> AppResult<Assignment> {
        self.collection.insert_one(&assignment).await?;
        Ok(assignment)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Assignment>> {
        let assignment = self
            .collection
            .find_one(doc! { "_id": id, "is_active": true })
            .await?;
        Ok(assignment)
    }

    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        week_number: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<Assignment>> {
        let mut filter = doc! { "is_active": true };
        if let Some(class_id) = class_id {
            filter.insert("class_id", class_id);
        }
        if let Some(week_number) = week_number {
            filter.insert("week_number", week_number);
        }
        if let Some(year) = year {
            filter.insert("year", year);
        }

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "due_date": -1 })
            .await?;
        let assignments: Vec<Assignment> = cursor.try_collect().await?;
        Ok(assignments)
    }

    async fn find_published_for_class(&self, class_id: &ObjectId) -> AppResult<Vec<Assignment>> {
        let cursor = self
            .collection
            .find(doc! {
                "class_id": class_id,
                "status": "published",
                "is_active": true,
            })
            .sort(doc! { "due_date": 1 })
            .await?;
        let assignments: Vec<Assignment> = cursor.try_collect().await?;
        Ok(assignments)
    }

    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<Assignment> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let assignment = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "is_active": true },
                doc! { "$set": fields },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment with id '{}' not found", id)))?;

        Ok(assignment)
    }

    async fn set_status(&self, id: &ObjectId, status: AssignmentStatus) -> AppResult<Assignment> {
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
                "Assignment with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "class_id": 1, "week_number": 1, "year": 1 })
            .build();
        self.collection.create_index(model).await?;
        Ok(())
    }
}

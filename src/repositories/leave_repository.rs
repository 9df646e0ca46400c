use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{LeaveRequest, LeaveStatus},
};

#[async_trait]
pub trait LeaveRepository: Send + Sync {
    async fn create(&self, leave: LeaveRequest) -> AppResult<LeaveRequest>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<LeaveRequest>>;
    async fn find_by_user(&self, user_id: &ObjectId) -> AppResult<Vec<LeaveRequest>>;
    async fn find_all(&self, status: Option<LeaveStatus>) -> AppResult<Vec<LeaveRequest>>;
    async fn update(&self, id: &ObjectId, leave: LeaveRequest) -> AppResult<LeaveRequest>;
    async fn soft_delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoLeaveRepository {
    collection: Collection<LeaveRequest>,
}

impl MongoLeaveRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("leaves");
        Self { collection }
    }
}

fn status_str(status: LeaveStatus) -> &'static str {
    match status {
        LeaveStatus::Pending => "pending",
        LeaveStatus::Approved => "approved",
        LeaveStatus::Rejected => "rejected",
    }
}

#[async_trait]
impl LeaveRepository for MongoLeaveRepository {
    async fn create(&self, leave: LeaveRequest) -> AppResult<LeaveRequest> {
        self.collection.insert_one(&leave).await?;
        Ok(leave)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<LeaveRequest>> {
        let leave = self
            .collection
            .find_one(doc! { "_id": id, "is_active": true })
            .await?;
        Ok(leave)
    }

    async fn find_by_user(&self, user_id: &ObjectId) -> AppResult<Vec<LeaveRequest>> {
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id, "is_active": true })
            .sort(doc! { "start_date": -1 })
            .await?;
        let leaves: Vec<LeaveRequest> = cursor.try_collect().await?;
        Ok(leaves)
    }

    async fn find_all(&self, status: Option<LeaveStatus>) -> AppResult<Vec<LeaveRequest>> {
        let mut filter = doc! { "is_active": true };
        if let Some(status) = status {
            filter.insert("status", status_str(status));
        }

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "start_date": -1 })
            .await?;
        let leaves: Vec<LeaveRequest> = cursor.try_collect().await?;
        Ok(leaves)
    }

    async fn update(&self, id: &ObjectId, leave: LeaveRequest) -> AppResult<LeaveRequest> {
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &leave)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Leave request with id '{}' not found",
                id
            )));
        }

        Ok(leave)
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
                "Leave request with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "start_date": -1 })
            .build();
        self.collection.create_index(model).await?;
        Ok(())
    }
}

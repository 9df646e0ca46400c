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
    models::domain::Session,
};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: Session) -> AppResult<Session>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Session>>;
    async fn find_by_name(&self, session_name: &str) -> AppResult<Option<Session>>;
    async fn find_all(&self) -> AppResult<Vec<Session>>;
    async fn find_active(&self) -> AppResult<Option<Session>>;
    /// Clears the active flag everywhere; a single session is then marked.
    async fn deactivate_all(&self) -> AppResult<()>;
    async fn set_active(&self, id: &ObjectId, active: bool) -> AppResult<()>;
    async fn delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoSessionRepository {
    collection: Collection<Session>,
}

impl MongoSessionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("sessions");
        Self { collection }
    }
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn create(&self, session: Session) -> AppResult<Session> {
        self.collection.insert_one(&session).await?;
        Ok(session)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Session>> {
        let session = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(session)
    }

    async fn find_by_name(&self, session_name: &str) -> AppResult<Option<Session>> {
        let session = self
            .collection
            .find_one(doc! { "session_name": session_name })
            .await?;
        Ok(session)
    }

    async fn find_all(&self) -> AppResult<Vec<Session>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "session_name": -1 })
            .await?;
        let sessions: Vec<Session> = cursor.try_collect().await?;
        Ok(sessions)
    }

    async fn find_active(&self) -> AppResult<Option<Session>> {
        let session = self.collection.find_one(doc! { "is_active": true }).await?;
        Ok(session)
    }

    async fn deactivate_all(&self) -> AppResult<()> {
        self.collection
            .update_many(
                doc! { "is_active": true },
                doc! { "$set": { "is_active": false } },
            )
            .await?;
        Ok(())
    }

    async fn set_active(&self, id: &ObjectId, active: bool) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "is_active": active } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Session with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Session with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "session_name": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Ensured unique index on session_name");

        Ok(())
    }
}

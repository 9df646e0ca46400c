use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{Message, MessageStatus},
};

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: Message) -> AppResult<Message>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Message>>;
    async fn find_all(&self, status: Option<MessageStatus>) -> AppResult<Vec<Message>>;
    /// Dispatched announcements, newest first. Feeds the student inbox.
    async fn find_sent(&self) -> AppResult<Vec<Message>>;
    async fn update(&self, id: &ObjectId, message: Message) -> AppResult<Message>;
    async fn count(&self, filter: Document) -> AppResult<u64>;
    async fn delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoMessageRepository {
    collection: Collection<Message>,
}

impl MongoMessageRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("messages");
        Self { collection }
    }
}

fn status_str(status: MessageStatus) -> &'static str {
    match status {
        MessageStatus::Draft => "draft",
        MessageStatus::Scheduled => "scheduled",
        MessageStatus::Sent => "sent",
        MessageStatus::Failed => "failed",
    }
}

#[async_trait]
impl MessageRepository for MongoMessageRepository {
    async fn create(&self, message: Message) -> AppResult<Message> {
        self.collection.insert_one(&message).await?;
        Ok(message)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Message>> {
        let message = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(message)
    }

    async fn find_all(&self, status: Option<MessageStatus>) -> AppResult<Vec<Message>> {
        let mut filter = doc! {};
        if let Some(status) = status {
            filter.insert("status", status_str(status));
        }

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?;
        let messages: Vec<Message> = cursor.try_collect().await?;
        Ok(messages)
    }

    async fn find_sent(&self) -> AppResult<Vec<Message>> {
        let cursor = self
            .collection
            .find(doc! { "status": "sent" })
            .sort(doc! { "sent_at": -1 })
            .await?;
        let messages: Vec<Message> = cursor.try_collect().await?;
        Ok(messages)
    }

    async fn update(&self, id: &ObjectId, message: Message) -> AppResult<Message> {
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &message)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Message with id '{}' not found",
                id
            )));
        }

        Ok(message)
    }

    async fn count(&self, filter: Document) -> AppResult<u64> {
        let count = self.collection.count_documents(filter).await?;
        Ok(count)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Message with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "status": 1, "sent_at": -1 })
            .build();
        self.collection.create_index(model).await?;
        Ok(())
    }
}

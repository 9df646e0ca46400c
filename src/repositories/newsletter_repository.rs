use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::NewsletterSubscriber,
};

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    async fn create(&self, subscriber: NewsletterSubscriber) -> AppResult<NewsletterSubscriber>;
    /// Email lookups are exact; callers normalize casing first.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<NewsletterSubscriber>>;
    async fn find_by_token(&self, token: &str) -> AppResult<Option<NewsletterSubscriber>>;
    async fn find_active(&self) -> AppResult<Vec<NewsletterSubscriber>>;
    async fn update(
        &self,
        email: &str,
        subscriber: NewsletterSubscriber,
    ) -> AppResult<NewsletterSubscriber>;
    async fn count(&self, filter: Document) -> AppResult<u64>;
    async fn delete(&self, email: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoNewsletterRepository {
    collection: Collection<NewsletterSubscriber>,
}

impl MongoNewsletterRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("newsletter_subscribers");
        Self { collection }
    }
}

#[async_trait]
impl NewsletterRepository for MongoNewsletterRepository {
    async fn create(&self, subscriber: NewsletterSubscriber) -> AppResult<NewsletterSubscriber> {
        self.collection.insert_one(&subscriber).await?;
        Ok(subscriber)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<NewsletterSubscriber>> {
        let subscriber = self.collection.find_one(doc! { "email": email }).await?;
        Ok(subscriber)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<NewsletterSubscriber>> {
        let subscriber = self
            .collection
            .find_one(doc! { "verification_token": token })
            .await?;
        Ok(subscriber)
    }

    async fn find_active(&self) -> AppResult<Vec<NewsletterSubscriber>> {
        let cursor = self
            .collection
            .find(doc! { "is_active": true, "is_verified": true })
            .sort(doc! { "subscribed_at": -1 })
            .await?;
        let subscribers: Vec<NewsletterSubscriber> = cursor.try_collect().await?;
        Ok(subscribers)
    }

    async fn update(
        &self,
        email: &str,
        subscriber: NewsletterSubscriber,
    ) -> AppResult<NewsletterSubscriber> {
        let result = self
            .collection
            .replace_one(doc! { "email": email }, &subscriber)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Subscriber '{}' not found",
                email
            )));
        }

        Ok(subscriber)
    }

    async fn count(&self, filter: Document) -> AppResult<u64> {
        let count = self.collection.count_documents(filter).await?;
        Ok(count)
    }

    async fn delete(&self, email: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "email": email }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Subscriber '{}' not found",
                email
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Ensured unique index on subscriber email");

        Ok(())
    }
}

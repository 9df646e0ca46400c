use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::doc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::NewsletterSubscriber,
    models::dto::request::{SubscribeRequest, UpdatePreferencesRequest},
    models::dto::response::NewsletterStatsResponse,
    repositories::NewsletterRepository,
};

pub struct NewsletterService {
    subscribers: Arc<dyn NewsletterRepository>,
}

impl NewsletterService {
    pub fn new(subscribers: Arc<dyn NewsletterRepository>) -> Self {
        Self { subscribers }
    }

    /// Subscribes an email address. A previously unsubscribed address is
    /// quietly reactivated; an already active one is a conflict.
    pub async fn subscribe(&self, request: SubscribeRequest) -> AppResult<NewsletterSubscriber> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let source = request.source.unwrap_or_else(|| "website".to_string());

        match self.subscribers.find_by_email(&email).await? {
            Some(mut existing) if !existing.is_active => {
                existing.resubscribe();
                existing.modified_at = Some(Utc::now());
                self.subscribers.update(&email, existing).await
            }
            Some(_) => Err(AppError::AlreadyExists(format!(
                "'{}' is already subscribed",
                email
            ))),
            None => {
                let subscriber = NewsletterSubscriber::new(&email, &source);
                log::info!("New newsletter subscriber: {}", subscriber.email);
                self.subscribers.create(subscriber).await
            }
        }
    }

    pub async fn verify(&self, token: &str) -> AppResult<NewsletterSubscriber> {
        let mut subscriber = self
            .subscribers
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Invalid verification token".to_string()))?;

        subscriber.verify();
        subscriber.modified_at = Some(Utc::now());

        let email = subscriber.email.clone();
        self.subscribers.update(&email, subscriber).await
    }

    pub async fn unsubscribe(&self, email: &str) -> AppResult<NewsletterSubscriber> {
        let email = email.trim().to_lowercase();
        let mut subscriber = self
            .subscribers
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subscriber '{}' not found", email)))?;

        if !subscriber.is_active {
            return Err(AppError::ValidationError(format!(
                "'{}' is already unsubscribed",
                email
            )));
        }

        subscriber.unsubscribe();
        subscriber.modified_at = Some(Utc::now());

        self.subscribers.update(&email, subscriber).await
    }

    pub async fn update_preferences(
        &self,
        email: &str,
        request: UpdatePreferencesRequest,
    ) -> AppResult<NewsletterSubscriber> {
        let email = email.trim().to_lowercase();
        let mut subscriber = self
            .subscribers
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subscriber '{}' not found", email)))?;

        subscriber.preferences = request.preferences;
        subscriber.modified_at = Some(Utc::now());

        self.subscribers.update(&email, subscriber).await
    }

    pub async fn list_active(&self) -> AppResult<Vec<NewsletterSubscriber>> {
        self.subscribers.find_active().await
    }

    /// Hard delete, for removal requests. Ordinary opt-out is `unsubscribe`.
    pub async fn remove(&self, email: &str) -> AppResult<()> {
        let email = email.trim().to_lowercase();
        self.subscribers.delete(&email).await
    }

    pub async fn stats(&self) -> AppResult<NewsletterStatsResponse> {
        let total = self.subscribers.count(doc! {}).await?;
        let active = self
            .subscribers
            .count(doc! { "is_active": true, "is_verified": true })
            .await?;
        let verified = self.subscribers.count(doc! { "is_verified": true }).await?;
        let unsubscribed = self.subscribers.count(doc! { "is_active": false }).await?;

        Ok(NewsletterStatsResponse {
            total,
            active,
            verified,
            unsubscribed,
        })
    }
}

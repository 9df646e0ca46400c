use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewsletterSubscriber {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsubscribed_at: Option<DateTime<Utc>>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub preferences: SubscriberPreferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

fn default_source() -> String {
    "website".to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubscriberPreferences {
    #[serde(default = "default_true")]
    pub announcements: bool,
    #[serde(default = "default_true")]
    pub class_updates: bool,
    #[serde(default = "default_true")]
    pub events: bool,
    #[serde(default)]
    pub results: bool,
}

impl Default for SubscriberPreferences {
    fn default() -> Self {
        Self {
            announcements: true,
            class_updates: true,
            events: true,
            results: false,
        }
    }
}

impl NewsletterSubscriber {
    pub fn new(email: &str, source: &str) -> Self {
        NewsletterSubscriber {
            id: Some(ObjectId::new()),
            email: email.trim().to_lowercase(),
            is_active: true,
            is_verified: false,
            verification_token: Some(Uuid::new_v4().simple().to_string()),
            subscribed_at: Utc::now(),
            unsubscribed_at: None,
            source: source.to_string(),
            preferences: SubscriberPreferences::default(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn verify(&mut self) {
        self.is_verified = true;
        self.verification_token = None;
    }

    pub fn unsubscribe(&mut self) {
        self.is_active = false;
        self.unsubscribed_at = Some(Utc::now());
    }

    pub fn resubscribe(&mut self) {
        self.is_active = true;
        self.unsubscribed_at = None;
        self.subscribed_at = Utc::now();
    }

    pub fn subscription_status(&self) -> &'static str {
        if !self.is_verified {
            "pending"
        } else if !self.is_active {
            "unsubscribed"
        } else {
            "active"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_subscriber_normalizes_email_and_is_pending() {
        let sub = NewsletterSubscriber::new("  Parent@Example.COM ", "website");
        assert_eq!(sub.email, "parent@example.com");
        assert_eq!(sub.subscription_status(), "pending");
        assert!(sub.verification_token.is_some());
    }

    #[test]
    fn verify_then_unsubscribe_then_resubscribe() {
        let mut sub = NewsletterSubscriber::new("parent@example.com", "admin");

        sub.verify();
        assert_eq!(sub.subscription_status(), "active");
        assert!(sub.verification_token.is_none());

        sub.unsubscribe();
        assert_eq!(sub.subscription_status(), "unsubscribed");
        assert!(sub.unsubscribed_at.is_some());

        sub.resubscribe();
        assert_eq!(sub.subscription_status(), "active");
        assert!(sub.unsubscribed_at.is_none());
    }
}

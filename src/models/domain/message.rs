use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A broadcast announcement. Dispatch state is recorded here; actual
/// delivery is handled outside this service.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub recipients: MessageRecipients,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent_count: i32,
    #[serde(default)]
    pub failed_count: i32,
    pub sent_by: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Default)]
pub struct MessageRecipients {
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub class_ids: Vec<ObjectId>,
    #[serde(default)]
    pub session_ids: Vec<ObjectId>,
    #[serde(default)]
    pub custom_emails: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Draft,
    Scheduled,
    Sent,
    Failed,
}

impl Message {
    /// Whether a student enrolled in `class_id` is addressed by this message.
    pub fn targets_class(&self, class_id: &ObjectId) -> bool {
        self.recipients.all || self.recipients.class_ids.contains(class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_class_honors_all_flag_and_class_list() {
        let class_a = ObjectId::new();
        let class_b = ObjectId::new();

        let mut message = Message {
            id: None,
            subject: "Eid holidays".to_string(),
            message: "School closed next week".to_string(),
            recipients: MessageRecipients {
                all: false,
                class_ids: vec![class_a],
                session_ids: vec![],
                custom_emails: vec![],
            },
            status: MessageStatus::Sent,
            scheduled_at: None,
            sent_at: Some(Utc::now()),
            sent_count: 10,
            failed_count: 0,
            sent_by: ObjectId::new(),
            created_at: None,
            modified_at: None,
        };

        assert!(message.targets_class(&class_a));
        assert!(!message.targets_class(&class_b));

        message.recipients.all = true;
        assert!(message.targets_class(&class_b));
    }
}

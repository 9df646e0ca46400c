use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        ClassProgressStatus, Message, MessageRecipients, MessageStatus,
    },
    models::dto::request::CreateMessageRequest,
    models::dto::response::MessageStatsResponse,
    repositories::{MessageRepository, StudentRepository},
};

pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
    students: Arc<dyn StudentRepository>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageRepository>, students: Arc<dyn StudentRepository>) -> Self {
        Self { messages, students }
    }

    /// Drafts an announcement; a `scheduled_at` in the future parks it as
    /// scheduled instead.
    pub async fn create(&self, request: CreateMessageRequest) -> AppResult<Message> {
        request.validate()?;

        let mut class_ids = Vec::with_capacity(request.class_ids.len());
        for id in &request.class_ids {
            class_ids.push(ObjectId::parse_str(id)?);
        }
        let mut session_ids = Vec::with_capacity(request.session_ids.len());
        for id in &request.session_ids {
            session_ids.push(ObjectId::parse_str(id)?);
        }

        if !request.all
            && class_ids.is_empty()
            && session_ids.is_empty()
            && request.custom_emails.is_empty()
        {
            return Err(AppError::ValidationError(
                "Message has no recipients".to_string(),
            ));
        }

        let status = match request.scheduled_at {
            Some(at) if at > Utc::now() => MessageStatus::Scheduled,
            _ => MessageStatus::Draft,
        };

        let message = Message {
            id: Some(ObjectId::new()),
            subject: request.subject,
            message: request.message,
            recipients: MessageRecipients {
                all: request.all,
                class_ids,
                session_ids,
                custom_emails: request.custom_emails,
            },
            status,
            scheduled_at: request.scheduled_at,
            sent_at: None,
            sent_count: 0,
            failed_count: 0,
            sent_by: ObjectId::parse_str(&request.sent_by)?,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        };

        self.messages.create(message).await
    }

    /// Marks the message dispatched and records the audience size. Actual
    /// delivery runs out of process.
    pub async fn send(&self, id: &str) -> AppResult<Message> {
        let oid = ObjectId::parse_str(id)?;
        let mut message = self
            .messages
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Message with id '{}' not found", id)))?;

        if message.status == MessageStatus::Sent {
            return Err(AppError::AlreadyExists(
                "Message has already been sent".to_string(),
            ));
        }

        let mut recipients = message.recipients.custom_emails.len() as i32;
        if message.recipients.all {
            recipients += self.students.find_all().await?.len() as i32;
        } else {
            for class_id in &message.recipients.class_ids {
                recipients += self.students.count_enrolled_in_class(class_id).await? as i32;
            }
        }

        message.status = MessageStatus::Sent;
        message.sent_at = Some(Utc::now());
        message.sent_count = recipients;
        message.failed_count = 0;
        message.modified_at = Some(Utc::now());

        log::info!("Message '{}' sent to {} recipients", message.subject, recipients);

        self.messages.update(&oid, message).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Message> {
        let oid = ObjectId::parse_str(id)?;
        self.messages
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Message with id '{}' not found", id)))
    }

    pub async fn list(&self, status: Option<MessageStatus>) -> AppResult<Vec<Message>> {
        self.messages.find_all(status).await
    }

    /// Sent announcements addressed to the student's current class (or to
    /// everyone).
    pub async fn feed_for_student(&self, student_id: &str) -> AppResult<Vec<Message>> {
        let oid = ObjectId::parse_str(student_id)?;
        let student = self
            .students
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Student with id '{}' not found", student_id))
            })?;

        let current_class = student
            .class_history
            .iter()
            .find(|e| e.status == ClassProgressStatus::InProgress)
            .map(|e| e.class_id);

        let sent = self.messages.find_sent().await?;
        Ok(sent
            .into_iter()
            .filter(|m| {
                m.recipients.all
                    || current_class.map_or(false, |class_id| m.targets_class(&class_id))
            })
            .collect())
    }

    pub async fn stats(&self) -> AppResult<MessageStatsResponse> {
        let total = self.messages.count(doc! {}).await?;
        let draft = self.messages.count(doc! { "status": "draft" }).await?;
        let scheduled = self.messages.count(doc! { "status": "scheduled" }).await?;
        let sent = self.messages.count(doc! { "status": "sent" }).await?;

        Ok(MessageStatsResponse {
            total,
            draft,
            scheduled,
            sent,
        })
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.messages.delete(&oid).await
    }
}

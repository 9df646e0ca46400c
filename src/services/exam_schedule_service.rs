use std::sync::Arc;

use chrono::{Duration, Utc};
use mongodb::bson::{oid::ObjectId, to_bson, Document};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ExamSchedule, ExamStatus},
    models::dto::request::{CreateExamScheduleRequest, UpdateExamScheduleRequest},
    repositories::{ClassRepository, ExamScheduleRepository},
};

pub struct ExamScheduleService {
    exams: Arc<dyn ExamScheduleRepository>,
    classes: Arc<dyn ClassRepository>,
}

impl ExamScheduleService {
    pub fn new(exams: Arc<dyn ExamScheduleRepository>, classes: Arc<dyn ClassRepository>) -> Self {
        Self { exams, classes }
    }

    pub async fn create(&self, request: CreateExamScheduleRequest) -> AppResult<ExamSchedule> {
        request.validate()?;

        let class_id = ObjectId::parse_str(&request.class_id)?;
        let class = self
            .classes
            .find_by_id(&class_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Class with id '{}' not found", request.class_id))
            })?;

        let created_by = match request.created_by {
            Some(ref id) => Some(ObjectId::parse_str(id)?),
            None => None,
        };

        let schedule = ExamSchedule {
            id: Some(ObjectId::new()),
            exam_name: request.exam_name,
            class_id,
            class_name: class.class_name,
            subject: request.subject,
            exam_date: request.exam_date,
            start_time: request.start_time,
            end_time: request.end_time,
            duration: request.duration,
            total_marks: request.total_marks.unwrap_or(100),
            passing_marks: request.passing_marks.unwrap_or(40),
            exam_type: request.exam_type.unwrap_or_else(|| "final".to_string()),
            status: ExamStatus::Scheduled,
            created_by,
            is_active: true,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        };

        self.exams.create(schedule).await
    }

    pub async fn get(&self, id: &str) -> AppResult<ExamSchedule> {
        let oid = ObjectId::parse_str(id)?;
        self.exams
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Exam schedule with id '{}' not found", id)))
    }

    pub async fn list(
        &self,
        class_id: Option<&str>,
        status: Option<ExamStatus>,
    ) -> AppResult<Vec<ExamSchedule>> {
        let class_oid = match class_id {
            Some(id) => Some(ObjectId::parse_str(id)?),
            None => None,
        };
        self.exams.find_all(class_oid.as_ref(), status).await
    }

    /// Scheduled exams over the next seven days.
    pub async fn upcoming(&self) -> AppResult<Vec<ExamSchedule>> {
        let now = Utc::now();
        self.exams.find_in_window(now, now + Duration::days(7)).await
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateExamScheduleRequest,
    ) -> AppResult<ExamSchedule> {
        request.validate()?;
        let oid = ObjectId::parse_str(id)?;

        let mut fields = Document::new();
        if let Some(exam_name) = request.exam_name {
            fields.insert("exam_name", exam_name);
        }
        if let Some(class_id) = request.class_id {
            let class_oid = ObjectId::parse_str(&class_id)?;
            let class = self
                .classes
                .find_by_id(&class_oid)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Class with id '{}' not found", class_id))
                })?;
            fields.insert("class_id", class_oid);
            fields.insert("class_name", class.class_name);
        }
        if let Some(subject) = request.subject {
            fields.insert("subject", subject);
        }
        if let Some(exam_date) = request.exam_date {
            fields.insert("exam_date", to_bson(&exam_date)?);
        }
        if let Some(start_time) = request.start_time {
            fields.insert("start_time", start_time);
        }
        if let Some(end_time) = request.end_time {
            fields.insert("end_time", end_time);
        }
        if let Some(duration) = request.duration {
            fields.insert("duration", duration);
        }
        if let Some(total_marks) = request.total_marks {
            fields.insert("total_marks", total_marks);
        }
        if let Some(passing_marks) = request.passing_marks {
            fields.insert("passing_marks", passing_marks);
        }
        if let Some(exam_type) = request.exam_type {
            fields.insert("exam_type", exam_type);
        }

        if fields.is_empty() {
            return self.get(id).await;
        }
        fields.insert("modified_at", to_bson(&Utc::now())?);

        self.exams.update_fields(&oid, fields).await
    }

    pub async fn set_status(&self, id: &str, status: ExamStatus) -> AppResult<ExamSchedule> {
        let oid = ObjectId::parse_str(id)?;
        self.exams.set_status(&oid, status).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.exams.delete(&oid).await
    }
}

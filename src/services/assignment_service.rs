use std::sync::Arc;

use chrono::{Datelike, Utc};
use mongodb::bson::{oid::ObjectId, to_bson, Document};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Assignment, AssignmentStatus, Question},
    models::dto::request::{CreateAssignmentRequest, UpdateAssignmentRequest},
    models::dto::response::StudentSummary,
    repositories::{
        AssignmentRepository, ClassRepository, StudentRepository, SubmissionRepository,
    },
    services::grading,
};

pub struct AssignmentService {
    assignments: Arc<dyn AssignmentRepository>,
    classes: Arc<dyn ClassRepository>,
    students: Arc<dyn StudentRepository>,
    submissions: Arc<dyn SubmissionRepository>,
}

impl AssignmentService {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        classes: Arc<dyn ClassRepository>,
        students: Arc<dyn StudentRepository>,
        submissions: Arc<dyn SubmissionRepository>,
    ) -> Self {
        Self {
            assignments,
            classes,
            students,
            submissions,
        }
    }

    pub async fn create(&self, request: CreateAssignmentRequest) -> AppResult<Assignment> {
        request.validate()?;

        let class_id = ObjectId::parse_str(&request.class_id)?;
        let class = self
            .classes
            .find_by_id(&class_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Class with id '{}' not found", request.class_id))
            })?;

        let questions: Vec<Question> = request.questions.into_iter().map(Into::into).collect();
        grading::validate_questions(&questions)?;

        let created_by = match request.created_by {
            Some(ref id) => Some(ObjectId::parse_str(id)?),
            None => None,
        };

        // Weekly planning defaults to the ISO week of the due date.
        let week_number = request
            .week_number
            .unwrap_or_else(|| request.due_date.iso_week().week() as i32);
        let year = request.year.unwrap_or_else(|| request.due_date.year());

        let mut assignment = Assignment {
            id: Some(ObjectId::new()),
            title: request.title,
            description: request.description,
            class_id,
            class_name: class.class_name,
            subject: request.subject,
            due_date: request.due_date,
            end_time: request.end_time,
            total_marks: 0,
            status: AssignmentStatus::Draft,
            week_number,
            year,
            questions,
            attachments: request.attachments.into_iter().map(Into::into).collect(),
            created_by,
            is_active: true,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        };
        assignment.recompute_total_marks();

        self.assignments.create(assignment).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Assignment> {
        let oid = ObjectId::parse_str(id)?;
        self.assignments
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment with id '{}' not found", id)))
    }

    pub async fn list(
        &self,
        class_id: Option<&str>,
        week_number: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<Assignment>> {
        let class_oid = match class_id {
            Some(id) => Some(ObjectId::parse_str(id)?),
            None => None,
        };
        self.assignments
            .find_all(class_oid.as_ref(), week_number, year)
            .await
    }

    /// Published assignments for the current ISO week.
    pub async fn current_week(&self, class_id: &str) -> AppResult<Vec<Assignment>> {
        let class_oid = ObjectId::parse_str(class_id)?;
        let now = Utc::now();
        let assignments = self
            .assignments
            .find_all(
                Some(&class_oid),
                Some(now.iso_week().week() as i32),
                Some(now.year()),
            )
            .await?;

        Ok(assignments
            .into_iter()
            .filter(|a| a.status == AssignmentStatus::Published)
            .collect())
    }

    pub async fn update(&self, id: &str, request: UpdateAssignmentRequest) -> AppResult<Assignment> {
        request.validate()?;

        let oid = ObjectId::parse_str(id)?;
        let existing = self
            .assignments
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment with id '{}' not found", id)))?;

        let mut fields = Document::new();
        if let Some(title) = request.title {
            fields.insert("title", title);
        }
        if let Some(description) = request.description {
            fields.insert("description", description);
        }
        if let Some(subject) = request.subject {
            fields.insert("subject", subject);
        }
        if let Some(due_date) = request.due_date {
            fields.insert("due_date", to_bson(&due_date)?);
        }
        if let Some(end_time) = request.end_time {
            fields.insert("end_time", end_time);
        }
        if let Some(week_number) = request.week_number {
            fields.insert("week_number", week_number);
        }
        if let Some(year) = request.year {
            fields.insert("year", year);
        }

        if let Some(question_inputs) = request.questions {
            if existing.status != AssignmentStatus::Draft {
                return Err(AppError::ValidationError(
                    "Questions can only be changed while the assignment is a draft".to_string(),
                ));
            }

            let questions: Vec<Question> =
                question_inputs.into_iter().map(Into::into).collect();
            grading::validate_questions(&questions)?;

            let total_marks: i32 = questions.iter().map(|q| q.marks).sum();
            fields.insert("questions", to_bson(&questions)?);
            fields.insert("total_marks", total_marks);
        }

        if fields.is_empty() {
            return Ok(existing);
        }
        fields.insert("modified_at", to_bson(&Utc::now())?);

        self.assignments.update_fields(&oid, fields).await
    }

    pub async fn set_status(&self, id: &str, status: AssignmentStatus) -> AppResult<Assignment> {
        let oid = ObjectId::parse_str(id)?;
        self.assignments.set_status(&oid, status).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.assignments.soft_delete(&oid).await
    }

    /// Enrolled students with no active submission against the assignment.
    pub async fn missing_submissions(&self, id: &str) -> AppResult<Vec<StudentSummary>> {
        let oid = ObjectId::parse_str(id)?;
        let assignment = self
            .assignments
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Assignment with id '{}' not found", id)))?;

        let enrolled = self
            .students
            .find_enrolled_in_class(&assignment.class_id)
            .await?;
        let submissions = self.submissions.find_by_assignment(&oid).await?;

        let submitted: Vec<ObjectId> = submissions.iter().map(|s| s.student_id).collect();

        Ok(enrolled
            .into_iter()
            .filter(|s| s.id.map_or(false, |id| !submitted.contains(&id)))
            .map(|s| StudentSummary {
                id: s.id.map(|id| id.to_hex()).unwrap_or_default(),
                name: s.full_name(),
                roll_no: s.personal_info.roll_no,
                email: s.personal_info.email.clone(),
            })
            .collect())
    }
}

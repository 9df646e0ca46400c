use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::ExamResult,
    models::dto::request::{AddResultRequest, UpdateResultRequest},
    repositories::{ExamScheduleRepository, ResultRepository, StudentRepository},
};

pub struct ResultService {
    results: Arc<dyn ResultRepository>,
    students: Arc<dyn StudentRepository>,
    exams: Arc<dyn ExamScheduleRepository>,
}

impl ResultService {
    pub fn new(
        results: Arc<dyn ResultRepository>,
        students: Arc<dyn StudentRepository>,
        exams: Arc<dyn ExamScheduleRepository>,
    ) -> Self {
        Self {
            results,
            students,
            exams,
        }
    }

    pub async fn add(&self, request: AddResultRequest) -> AppResult<ExamResult> {
        request.validate()?;

        if request.marks_obtained > request.total_marks {
            return Err(AppError::ValidationError(
                "Marks obtained cannot exceed total marks".to_string(),
            ));
        }

        let student_id = ObjectId::parse_str(&request.student_id)?;
        let exam_id = ObjectId::parse_str(&request.exam_id)?;
        let class_id = ObjectId::parse_str(&request.class_id)?;

        let student = self
            .students
            .find_by_id(&student_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Student with id '{}' not found",
                    request.student_id
                ))
            })?;

        if self.exams.find_by_id(&exam_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Exam with id '{}' not found",
                request.exam_id
            )));
        }

        if self
            .results
            .find_by_student_and_exam(&student_id, &exam_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "Result already recorded for this student and exam".to_string(),
            ));
        }

        let mut result = ExamResult {
            id: Some(ObjectId::new()),
            student_id,
            student_name: student.full_name(),
            exam_id,
            exam_name: request.exam_name,
            class_id,
            subject: request.subject,
            marks_obtained: request.marks_obtained,
            total_marks: request.total_marks,
            percentage: 0.0,
            grade: String::new(),
            remarks: request.remarks,
            is_published: false,
            is_active: true,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        };
        result.recompute();

        self.results.create(result).await
    }

    pub async fn get(&self, id: &str) -> AppResult<ExamResult> {
        let oid = ObjectId::parse_str(id)?;
        self.results
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Result with id '{}' not found", id)))
    }

    /// Staff view: every result for a student, published or not.
    pub async fn all_for_student(&self, student_id: &str) -> AppResult<Vec<ExamResult>> {
        let oid = ObjectId::parse_str(student_id)?;
        self.results.find_by_student(&oid, false).await
    }

    /// Student view: only results that have been released.
    pub async fn published_for_student(&self, student_id: &str) -> AppResult<Vec<ExamResult>> {
        let oid = ObjectId::parse_str(student_id)?;
        self.results.find_by_student(&oid, true).await
    }

    pub async fn for_exam(&self, exam_id: &str) -> AppResult<Vec<ExamResult>> {
        let oid = ObjectId::parse_str(exam_id)?;
        self.results.find_by_exam(&oid).await
    }

    pub async fn update(&self, id: &str, request: UpdateResultRequest) -> AppResult<ExamResult> {
        request.validate()?;

        let oid = ObjectId::parse_str(id)?;
        let mut result = self
            .results
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Result with id '{}' not found", id)))?;

        if let Some(marks_obtained) = request.marks_obtained {
            if marks_obtained > result.total_marks {
                return Err(AppError::ValidationError(
                    "Marks obtained cannot exceed total marks".to_string(),
                ));
            }
            result.marks_obtained = marks_obtained;
        }
        if let Some(remarks) = request.remarks {
            result.remarks = Some(remarks);
        }

        result.recompute();
        result.modified_at = Some(Utc::now());

        self.results.update(&oid, result).await
    }

    /// Releases every result for an exam to students in one step.
    pub async fn publish_exam(&self, exam_id: &str) -> AppResult<u64> {
        let oid = ObjectId::parse_str(exam_id)?;
        let published = self.results.publish_by_exam(&oid).await?;
        log::info!("Published {} results for exam '{}'", published, exam_id);
        Ok(published)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.results.soft_delete(&oid).await
    }
}

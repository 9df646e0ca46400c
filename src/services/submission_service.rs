use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        Answer, Assignment, AssignmentStatus, AssignmentSubmission, SubmissionStatus,
    },
    models::dto::request::{ManualGradeRequest, SubmitAssignmentRequest},
    repositories::{AssignmentRepository, StudentRepository, SubmissionRepository},
    services::grading,
};

pub struct SubmissionService {
    submissions: Arc<dyn SubmissionRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    students: Arc<dyn StudentRepository>,
}

impl SubmissionService {
    pub fn new(
        submissions: Arc<dyn SubmissionRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            submissions,
            assignments,
            students,
        }
    }

    /// Records a submission. Late submissions are accepted and flagged; only
    /// a duplicate or a closed assignment is rejected.
    pub async fn submit(
        &self,
        request: SubmitAssignmentRequest,
    ) -> AppResult<AssignmentSubmission> {
        let assignment_id = ObjectId::parse_str(&request.assignment_id)?;
        let student_id = ObjectId::parse_str(&request.student_id)?;

        let assignment = self.open_assignment(&assignment_id).await?;

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

        if self
            .submissions
            .find_active(&assignment_id, &student_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(
                "Assignment has already been submitted".to_string(),
            ));
        }

        let now = Utc::now();
        let answers: Vec<Answer> = request.answers.into_iter().map(Into::into).collect();
        let (graded, total) = grading::grade_answers(&assignment.questions, answers);

        let status = if assignment.is_late(now) {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        };

        let submission = AssignmentSubmission {
            id: Some(ObjectId::new()),
            assignment_id,
            student_id,
            student_name: student.full_name(),
            answers: graded,
            attachments: request.attachments.into_iter().map(Into::into).collect(),
            status,
            submitted_at: now,
            total_marks_obtained: total,
            feedback: None,
            graded_by: None,
            graded_at: None,
            is_active: true,
            created_at: Some(now),
            modified_at: Some(now),
        };

        log::info!(
            "Assignment submission: student '{}', assignment '{}', status {:?}",
            submission.student_name,
            assignment.title,
            submission.status
        );

        self.submissions.create(submission).await
    }

    pub async fn get(&self, id: &str) -> AppResult<AssignmentSubmission> {
        let oid = ObjectId::parse_str(id)?;
        self.submissions
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission with id '{}' not found", id)))
    }

    pub async fn list_by_assignment(
        &self,
        assignment_id: &str,
    ) -> AppResult<Vec<AssignmentSubmission>> {
        let oid = ObjectId::parse_str(assignment_id)?;
        self.submissions.find_by_assignment(&oid).await
    }

    pub async fn list_by_student(
        &self,
        student_id: &str,
    ) -> AppResult<Vec<AssignmentSubmission>> {
        let oid = ObjectId::parse_str(student_id)?;
        self.submissions.find_by_student(&oid).await
    }

    pub async fn grade(
        &self,
        id: &str,
        request: ManualGradeRequest,
    ) -> AppResult<AssignmentSubmission> {
        let oid = ObjectId::parse_str(id)?;
        let mut submission = self
            .submissions
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission with id '{}' not found", id)))?;

        submission.answers = request.answers.into_iter().map(Into::into).collect();
        submission.total_marks_obtained = request.total_marks_obtained;
        submission.feedback = request.feedback;
        submission.graded_by = Some(ObjectId::parse_str(&request.graded_by)?);
        submission.graded_at = Some(Utc::now());
        submission.status = SubmissionStatus::Graded;
        submission.modified_at = Some(Utc::now());

        self.submissions.update(&oid, submission).await
    }

    async fn open_assignment(&self, assignment_id: &ObjectId) -> AppResult<Assignment> {
        let assignment = self
            .assignments
            .find_by_id(assignment_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Assignment with id '{}' not found",
                    assignment_id
                ))
            })?;

        match assignment.status {
            AssignmentStatus::Published => Ok(assignment),
            AssignmentStatus::Draft => Err(AppError::ValidationError(
                "Assignment has not been published".to_string(),
            )),
            AssignmentStatus::Closed => Err(AppError::ValidationError(
                "Assignment is closed for submissions".to_string(),
            )),
        }
    }
}

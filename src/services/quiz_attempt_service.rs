use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Answer, AttemptStatus, Quiz, QuizAttempt, QuizStatus, Student},
    models::dto::request::{ManualGradeRequest, StartQuizAttemptRequest, SubmitQuizAttemptRequest},
    repositories::{QuizAttemptRepository, QuizRepository, StudentRepository},
    services::grading,
};

pub struct QuizAttemptService {
    attempts: Arc<dyn QuizAttemptRepository>,
    quizzes: Arc<dyn QuizRepository>,
    students: Arc<dyn StudentRepository>,
}

impl QuizAttemptService {
    pub fn new(
        attempts: Arc<dyn QuizAttemptRepository>,
        quizzes: Arc<dyn QuizRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            attempts,
            quizzes,
            students,
        }
    }

    /// Opens an attempt. A second active attempt for the same quiz and
    /// student is a conflict.
    pub async fn start(&self, request: StartQuizAttemptRequest) -> AppResult<QuizAttempt> {
        let quiz_id = ObjectId::parse_str(&request.quiz_id)?;
        let student_id = ObjectId::parse_str(&request.student_id)?;

        let quiz = self.open_quiz(&quiz_id).await?;
        let student = self.student(&student_id).await?;

        if quiz.is_expired(Utc::now()) {
            return Err(AppError::ValidationError(
                "Quiz is no longer open for attempts".to_string(),
            ));
        }

        if let Some(existing) = self.attempts.find_active(&quiz_id, &student_id).await? {
            return Err(AppError::AlreadyExists(format!(
                "Attempt already exists for this quiz (status: {:?})",
                existing.status
            )));
        }

        let attempt = QuizAttempt::new(quiz_id, student_id, &student.full_name());
        self.attempts.create(attempt).await
    }

    /// Submits answers and auto-grades the objective questions. Works both
    /// for attempts opened via [`start`](Self::start) and for single-shot
    /// submissions with no prior attempt.
    pub async fn submit(&self, request: SubmitQuizAttemptRequest) -> AppResult<QuizAttempt> {
        let quiz_id = ObjectId::parse_str(&request.quiz_id)?;
        let student_id = ObjectId::parse_str(&request.student_id)?;

        let quiz = self.open_quiz(&quiz_id).await?;
        let student = self.student(&student_id).await?;

        let mut attempt = match self.attempts.find_active(&quiz_id, &student_id).await? {
            Some(existing) if existing.status == AttemptStatus::InProgress => existing,
            Some(_) => {
                return Err(AppError::AlreadyExists(
                    "Quiz has already been submitted".to_string(),
                ));
            }
            None => {
                let fresh = QuizAttempt::new(quiz_id, student_id, &student.full_name());
                self.attempts.create(fresh).await?
            }
        };

        let answers: Vec<Answer> = request.answers.into_iter().map(Into::into).collect();
        let (graded, total) = grading::grade_answers(&quiz.questions, answers);
        let percentage = grading::percentage(total, quiz.total_marks);

        attempt.answers = graded;
        attempt.total_marks_obtained = total;
        attempt.percentage = percentage;
        attempt.passed = percentage >= f64::from(quiz.passing_marks);
        attempt.status = AttemptStatus::Submitted;
        attempt.submitted_at = Some(Utc::now());
        attempt.time_taken = request.time_taken.unwrap_or(0);
        attempt.modified_at = Some(Utc::now());

        let id = attempt
            .id
            .ok_or_else(|| AppError::InternalError("Attempt missing _id".to_string()))?;

        log::info!(
            "Quiz attempt submitted: student '{}', quiz '{}', score {}/{}",
            attempt.student_name,
            quiz.title,
            total,
            quiz.total_marks
        );

        self.attempts.update(&id, attempt).await
    }

    pub async fn get(&self, id: &str) -> AppResult<QuizAttempt> {
        let oid = ObjectId::parse_str(id)?;
        self.attempts
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz attempt with id '{}' not found", id)))
    }

    pub async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let oid = ObjectId::parse_str(quiz_id)?;
        self.attempts.find_by_quiz(&oid).await
    }

    pub async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let oid = ObjectId::parse_str(student_id)?;
        self.attempts.find_by_student(&oid).await
    }

    /// Manual grading for subjective questions. The grader's answer set
    /// replaces the stored one and the attempt moves to graded.
    pub async fn grade(&self, id: &str, request: ManualGradeRequest) -> AppResult<QuizAttempt> {
        let oid = ObjectId::parse_str(id)?;
        let mut attempt = self
            .attempts
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz attempt with id '{}' not found", id)))?;

        if attempt.status == AttemptStatus::InProgress {
            return Err(AppError::ValidationError(
                "Cannot grade an attempt that has not been submitted".to_string(),
            ));
        }

        let quiz = self
            .quizzes
            .find_by_id(&attempt.quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz for this attempt not found".to_string()))?;

        attempt.answers = request.answers.into_iter().map(Into::into).collect();
        attempt.total_marks_obtained = request.total_marks_obtained;
        attempt.percentage = grading::percentage(request.total_marks_obtained, quiz.total_marks);
        attempt.passed = attempt.percentage >= f64::from(quiz.passing_marks);
        attempt.feedback = request.feedback;
        attempt.graded_by = Some(ObjectId::parse_str(&request.graded_by)?);
        attempt.graded_at = Some(Utc::now());
        attempt.status = AttemptStatus::Graded;
        attempt.modified_at = Some(Utc::now());

        self.attempts.update(&oid, attempt).await
    }

    async fn open_quiz(&self, quiz_id: &ObjectId) -> AppResult<Quiz> {
        let quiz = self
            .quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

        match quiz.status {
            QuizStatus::Published | QuizStatus::Ongoing => Ok(quiz),
            QuizStatus::Draft => Err(AppError::ValidationError(
                "Quiz has not been published".to_string(),
            )),
            QuizStatus::Completed => Err(AppError::ValidationError(
                "Quiz is already completed".to_string(),
            )),
        }
    }

    async fn student(&self, student_id: &ObjectId) -> AppResult<Student> {
        self.students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Student with id '{}' not found", student_id))
            })
    }
}

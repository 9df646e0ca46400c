use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId, to_bson, Document};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Question, Quiz, QuizStatus},
    models::dto::request::{CreateQuizRequest, UpdateQuizRequest},
    repositories::{ClassRepository, QuizRepository},
    services::grading,
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    classes: Arc<dyn ClassRepository>,
}

impl QuizService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, classes: Arc<dyn ClassRepository>) -> Self {
        Self { quizzes, classes }
    }

    pub async fn create(&self, request: CreateQuizRequest) -> AppResult<Quiz> {
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

        let mut quiz = Quiz {
            id: Some(ObjectId::new()),
            title: request.title,
            description: request.description,
            class_id,
            class_name: class.class_name,
            subject: request.subject,
            quiz_date: request.quiz_date,
            start_time: request.start_time,
            end_time: request.end_time,
            duration: request.duration,
            total_marks: 0,
            passing_marks: request.passing_marks.unwrap_or(40),
            questions,
            status: QuizStatus::Draft,
            created_by,
            is_active: true,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        };
        quiz.recompute_total_marks();

        self.quizzes.create(quiz).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Quiz> {
        let oid = ObjectId::parse_str(id)?;
        self.quizzes
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    pub async fn list(
        &self,
        class_id: Option<&str>,
        status: Option<QuizStatus>,
    ) -> AppResult<Vec<Quiz>> {
        let class_oid = match class_id {
            Some(id) => Some(ObjectId::parse_str(id)?),
            None => None,
        };
        self.quizzes.find_all(class_oid.as_ref(), status).await
    }

    pub async fn list_open_for_class(&self, class_id: &str) -> AppResult<Vec<Quiz>> {
        let class_oid = ObjectId::parse_str(class_id)?;
        self.quizzes.find_published_for_class(&class_oid).await
    }

    /// Question edits are only allowed while the quiz is still a draft;
    /// once published, attempts may exist against the current questions.
    pub async fn update(&self, id: &str, request: UpdateQuizRequest) -> AppResult<Quiz> {
        request.validate()?;

        let oid = ObjectId::parse_str(id)?;
        let existing = self
            .quizzes
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;

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
        if let Some(quiz_date) = request.quiz_date {
            fields.insert("quiz_date", to_bson(&quiz_date)?);
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
        if let Some(passing_marks) = request.passing_marks {
            fields.insert("passing_marks", passing_marks);
        }

        if let Some(question_inputs) = request.questions {
            if existing.status != QuizStatus::Draft {
                return Err(AppError::ValidationError(
                    "Questions can only be changed while the quiz is a draft".to_string(),
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

        self.quizzes.update_fields(&oid, fields).await
    }

    pub async fn set_status(&self, id: &str, status: QuizStatus) -> AppResult<Quiz> {
        let oid = ObjectId::parse_str(id)?;

        if status == QuizStatus::Published {
            let quiz = self
                .quizzes
                .find_by_id(&oid)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;
            if quiz.questions.is_empty() {
                return Err(AppError::ValidationError(
                    "Cannot publish a quiz with no questions".to_string(),
                ));
            }
        }

        self.quizzes.set_status(&oid, status).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.quizzes.soft_delete(&oid).await
    }
}

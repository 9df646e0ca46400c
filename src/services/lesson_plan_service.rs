use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::{oid::ObjectId, to_bson, Document};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{LessonPlan, LessonPlanStatus},
    models::dto::request::{CreateLessonPlanRequest, UpdateLessonPlanRequest},
    repositories::{ClassRepository, LessonPlanRepository},
};

pub struct LessonPlanService {
    plans: Arc<dyn LessonPlanRepository>,
    classes: Arc<dyn ClassRepository>,
}

impl LessonPlanService {
    pub fn new(plans: Arc<dyn LessonPlanRepository>, classes: Arc<dyn ClassRepository>) -> Self {
        Self { plans, classes }
    }

    pub async fn create(&self, request: CreateLessonPlanRequest) -> AppResult<LessonPlan> {
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

        let plan = LessonPlan {
            id: Some(ObjectId::new()),
            title: request.title,
            description: request.description,
            class_id,
            class_name: class.class_name,
            subject: request.subject,
            week_number: request.week_number,
            year: request.year,
            content: request.content,
            status: LessonPlanStatus::Draft,
            attachments: request.attachments.into_iter().map(Into::into).collect(),
            created_by,
            is_active: true,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        };

        self.plans.create(plan).await
    }

    pub async fn get(&self, id: &str) -> AppResult<LessonPlan> {
        let oid = ObjectId::parse_str(id)?;
        self.plans
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson plan with id '{}' not found", id)))
    }

    pub async fn list(
        &self,
        class_id: Option<&str>,
        week_number: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<LessonPlan>> {
        let class_oid = match class_id {
            Some(id) => Some(ObjectId::parse_str(id)?),
            None => None,
        };
        self.plans
            .find_all(class_oid.as_ref(), week_number, year)
            .await
    }

    pub async fn update(&self, id: &str, request: UpdateLessonPlanRequest) -> AppResult<LessonPlan> {
        request.validate()?;
        let oid = ObjectId::parse_str(id)?;

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
        if let Some(week_number) = request.week_number {
            fields.insert("week_number", week_number);
        }
        if let Some(year) = request.year {
            fields.insert("year", year);
        }
        if let Some(content) = request.content {
            fields.insert("content", content);
        }

        if fields.is_empty() {
            return self.get(id).await;
        }
        fields.insert("modified_at", to_bson(&Utc::now())?);

        self.plans.update_fields(&oid, fields).await
    }

    pub async fn set_status(&self, id: &str, status: LessonPlanStatus) -> AppResult<LessonPlan> {
        let oid = ObjectId::parse_str(id)?;
        self.plans.set_status(&oid, status).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.plans.soft_delete(&oid).await
    }
}

use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::{oid::ObjectId, to_bson, Document};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Class,
    models::dto::request::{CreateClassRequest, UpdateClassRequest},
    repositories::ClassRepository,
};

pub struct ClassService {
    classes: Arc<dyn ClassRepository>,
}

impl ClassService {
    pub fn new(classes: Arc<dyn ClassRepository>) -> Self {
        Self { classes }
    }

    pub async fn create(&self, request: CreateClassRequest) -> AppResult<Class> {
        request.validate()?;

        if self
            .classes
            .find_by_name(&request.class_name)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "Class '{}' already exists",
                request.class_name
            )));
        }

        let class = Class::new(
            &request.class_name,
            request.teacher_assigned,
            request.class_timing,
            request.class_day,
        );

        log::info!("Created class '{}'", class.class_name);
        self.classes.create(class).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Class> {
        let oid = ObjectId::parse_str(id)?;
        self.classes
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class with id '{}' not found", id)))
    }

    pub async fn list(&self) -> AppResult<Vec<Class>> {
        self.classes.find_all().await
    }

    pub async fn update(&self, id: &str, request: UpdateClassRequest) -> AppResult<Class> {
        request.validate()?;
        let oid = ObjectId::parse_str(id)?;

        let mut fields = Document::new();
        if let Some(class_name) = request.class_name {
            // Renaming into an existing class would break the unique index.
            if let Some(existing) = self.classes.find_by_name(&class_name).await? {
                if existing.id != Some(oid) {
                    return Err(AppError::AlreadyExists(format!(
                        "Class '{}' already exists",
                        class_name
                    )));
                }
            }
            fields.insert("class_name", class_name);
        }
        if let Some(teacher_assigned) = request.teacher_assigned {
            fields.insert("teacher_assigned", teacher_assigned);
        }
        if let Some(class_timing) = request.class_timing {
            fields.insert("class_timing", class_timing);
        }
        if let Some(class_day) = request.class_day {
            fields.insert("class_day", class_day);
        }

        if fields.is_empty() {
            return self.get(id).await;
        }
        fields.insert("modified_at", to_bson(&Utc::now())?);

        self.classes.update_fields(&oid, fields).await
    }

    pub async fn set_active(&self, id: &str, active: bool) -> AppResult<Class> {
        let oid = ObjectId::parse_str(id)?;
        self.classes
            .update_fields(&oid, mongodb::bson::doc! { "is_active": active })
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.classes.delete(&oid).await
    }
}

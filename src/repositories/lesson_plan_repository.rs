use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{LessonPlan, LessonPlanStatus},
};

#[async_trait]
pub trait LessonPlanRepository: Send + Sync {
    async fn create(&self, plan: LessonPlan) -> AppResult<LessonPlan>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<LessonPlan>>;
    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        week_number: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<LessonPlan>>;
    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<LessonPlan>;
    async fn set_status(&self, id: &ObjectId, status: LessonPlanStatus) -> AppResult<LessonPlan>;
    async fn soft_delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoLessonPlanRepository {
    collection: Collection<LessonPlan>,
}

impl MongoLessonPlanRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("lesson_plans");
        Self { collection }
    }
}

fn status_str(status: LessonPlanStatus) -> &'static str {
    match status {
        LessonPlanStatus::Draft => "draft",
        LessonPlanStatus::Published => "published",
        LessonPlanStatus::Archived => "archived",
    }
}

#[async_trait]
impl LessonPlanRepository for MongoLessonPlanRepository {
    async fn create(&self, plan: LessonPlan) -> AppResult<LessonPlan> {
        self.collection.insert_one(&plan).await?;
        Ok(plan)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<LessonPlan>> {
        let plan = self
            .collection
            .find_one(doc! { "_id": id, "is_active": true })
            .await?;
        Ok(plan)
    }

    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        week_number: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<LessonPlan>> {
        let mut filter = doc! { "is_active": true };
        if let Some(class_id) = class_id {
            filter.insert("class_id", class_id);
        }
        if let Some(week_number) = week_number {
            filter.insert("week_number", week_number);
        }
        if let Some(year) = year {
            filter.insert("year", year);
        }

        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "year": -1, "week_number": -1 })
            .await?;
        let plans: Vec<LessonPlan> = cursor.try_collect().await?;
        Ok(plans)
    }

    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<LessonPlan> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let plan = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "is_active": true },
                doc! { "$set": fields },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Lesson plan with id '{}' not found", id)))?;

        Ok(plan)
    }

    async fn set_status(&self, id: &ObjectId, status: LessonPlanStatus) -> AppResult<LessonPlan> {
        self.update_fields(id, doc! { "status": status_str(status) })
            .await
    }

    async fn soft_delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id, "is_active": true },
                doc! { "$set": { "is_active": false } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Lesson plan with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "class_id": 1, "year": -1, "week_number": -1 })
            .build();
        self.collection.create_index(model).await?;
        Ok(())
    }
}

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Class,
};

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn create(&self, class: Class) -> AppResult<Class>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Class>>;
    async fn find_by_name(&self, class_name: &str) -> AppResult<Option<Class>>;
    async fn find_all(&self) -> AppResult<Vec<Class>>;
    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<Class>;
    async fn set_enrolled_count(&self, id: &ObjectId, count: i64) -> AppResult<()>;
    async fn delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoClassRepository {
    collection: Collection<Class>,
}

impl MongoClassRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("classes");
        Self { collection }
    }
}

#[async_trait]
impl ClassRepository for MongoClassRepository {
    async fn create(&self, class: Class) -> AppResult<Class> {
        self.collection.insert_one(&class).await?;
        Ok(class)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Class>> {
        let class = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(class)
    }

    async fn find_by_name(&self, class_name: &str) -> AppResult<Option<Class>> {
        let class = self
            .collection
            .find_one(doc! { "class_name": class_name })
            .await?;
        Ok(class)
    }

    async fn find_all(&self) -> AppResult<Vec<Class>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "class_name": 1 })
            .await?;
        let classes: Vec<Class> = cursor.try_collect().await?;
        Ok(classes)
    }

    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<Class> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let class = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .with_options(options)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class with id '{}' not found", id)))?;

        Ok(class)
    }

    async fn set_enrolled_count(&self, id: &ObjectId, count: i64) -> AppResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "students_enrolled": count } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Class with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Class with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "class_name": 1 })
            .options(options)
            .build();

        self.collection.create_index(model).await?;
        log::info!("Ensured unique index on class_name");

        Ok(())
    }
}

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Document},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::{ClassHistoryEntry, Student},
};

/// Students live in the `users` collection; staff accounts share it but are
/// managed elsewhere.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, student: Student) -> AppResult<Student>;
    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Student>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>>;
    async fn find_all(&self) -> AppResult<Vec<Student>>;
    /// Applies a dot-notation `$set` and returns the updated document.
    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<Student>;
    async fn replace(&self, id: &ObjectId, student: Student) -> AppResult<Student>;
    async fn push_class_history(&self, id: &ObjectId, entry: ClassHistoryEntry) -> AppResult<()>;
    /// Verified, active, accepted students with an in-progress enrollment in
    /// the class, ordered by roll number.
    async fn find_enrolled_in_class(&self, class_id: &ObjectId) -> AppResult<Vec<Student>>;
    async fn count_enrolled_in_class(&self, class_id: &ObjectId) -> AppResult<u64>;
    async fn delete(&self, id: &ObjectId) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoStudentRepository {
    collection: Collection<Student>,
}

impl MongoStudentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("users");
        Self { collection }
    }

    fn enrolled_filter(class_id: &ObjectId) -> Document {
        doc! {
            "personal_info.verified": true,
            "personal_info.status": "active",
            "personal_info.application_status": "accepted",
            "class_history": {
                "$elemMatch": {
                    "class_id": class_id,
                    "status": "inprogress",
                }
            }
        }
    }
}

#[async_trait]
impl StudentRepository for MongoStudentRepository {
    async fn create(&self, student: Student) -> AppResult<Student> {
        self.collection.insert_one(&student).await?;
        Ok(student)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Student>> {
        let student = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(student)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>> {
        let student = self
            .collection
            .find_one(doc! { "personal_info.email": email })
            .await?;
        Ok(student)
    }

    async fn find_all(&self) -> AppResult<Vec<Student>> {
        let cursor = self.collection.find(doc! {}).await?;
        let students: Vec<Student> = cursor.try_collect().await?;
        Ok(students)
    }

    async fn update_fields(&self, id: &ObjectId, fields: Document) -> AppResult<Student> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let student = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .with_options(options)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with id '{}' not found", id)))?;

        Ok(student)
    }

    async fn replace(&self, id: &ObjectId, student: Student) -> AppResult<Student> {
        let result = self
            .collection
            .replace_one(doc! { "_id": id }, &student)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Student with id '{}' not found",
                id
            )));
        }

        Ok(student)
    }

    async fn push_class_history(&self, id: &ObjectId, entry: ClassHistoryEntry) -> AppResult<()> {
        let entry_bson = to_bson(&entry)?;
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$push": { "class_history": entry_bson } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Student with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn find_enrolled_in_class(&self, class_id: &ObjectId) -> AppResult<Vec<Student>> {
        let cursor = self
            .collection
            .find(Self::enrolled_filter(class_id))
            .sort(doc! { "personal_info.roll_no": 1 })
            .await?;
        let students: Vec<Student> = cursor.try_collect().await?;
        Ok(students)
    }

    async fn count_enrolled_in_class(&self, class_id: &ObjectId) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(Self::enrolled_filter(class_id))
            .await?;
        Ok(count)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Student with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let options = IndexOptions::builder().unique(true).build();
        let model = IndexModel::builder()
            .keys(doc! { "personal_info.email": 1 })
            .options(options)
            .build();
        self.collection.create_index(model).await?;

        let model = IndexModel::builder()
            .keys(doc! { "class_history.class_id": 1 })
            .build();
        self.collection.create_index(model).await?;

        log::info!("Ensured indexes on users collection");
        Ok(())
    }
}

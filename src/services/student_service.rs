use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::{oid::ObjectId, to_bson, Document};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ApplicationStatus, Student, StudentStatus},
    models::dto::request::UpdateProfileRequest,
    repositories::StudentRepository,
};

pub struct StudentService {
    students: Arc<dyn StudentRepository>,
}

impl StudentService {
    pub fn new(students: Arc<dyn StudentRepository>) -> Self {
        Self { students }
    }

    pub async fn get(&self, id: &str) -> AppResult<Student> {
        let oid = ObjectId::parse_str(id)?;
        self.students
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student with id '{}' not found", id)))
    }

    pub async fn list(&self) -> AppResult<Vec<Student>> {
        self.students.find_all().await
    }

    /// Partial profile update. Only the provided fields are touched, via a
    /// dot-notation `$set`, so concurrent edits to other sub-fields survive.
    pub async fn update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> AppResult<Student> {
        request.validate()?;
        let oid = ObjectId::parse_str(id)?;

        let mut fields = Document::new();
        if let Some(first_name) = request.first_name {
            fields.insert("personal_info.first_name", first_name);
        }
        if let Some(last_name) = request.last_name {
            fields.insert("personal_info.last_name", last_name);
        }
        if let Some(father_name) = request.father_name {
            fields.insert("personal_info.father_name", father_name);
        }
        if let Some(gender) = request.gender {
            fields.insert("personal_info.gender", gender);
        }
        if let Some(whatsapp_no) = request.whatsapp_no {
            fields.insert("personal_info.whatsapp_no", whatsapp_no);
        }
        if let Some(dob) = request.dob {
            fields.insert("personal_info.dob", dob);
        }
        if let Some(age) = request.age {
            fields.insert("personal_info.age", age);
        }
        if let Some(address) = request.address {
            fields.insert("personal_info.address", address);
        }
        if let Some(city) = request.city {
            fields.insert("personal_info.city", city);
        }
        if let Some(country) = request.country {
            fields.insert("personal_info.country", country);
        }

        if fields.is_empty() {
            return self.get(id).await;
        }
        fields.insert("modified_at", to_bson(&Utc::now())?);

        self.students.update_fields(&oid, fields).await
    }

    pub async fn set_verified(&self, id: &str, verified: bool) -> AppResult<Student> {
        let oid = ObjectId::parse_str(id)?;
        self.students
            .update_fields(
                &oid,
                mongodb::bson::doc! {
                    "personal_info.verified": verified,
                    "modified_at": to_bson(&Utc::now())?,
                },
            )
            .await
    }

    pub async fn set_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> AppResult<Student> {
        let oid = ObjectId::parse_str(id)?;
        let value = match status {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        };

        log::info!("Student '{}' application status set to {}", id, value);

        self.students
            .update_fields(
                &oid,
                mongodb::bson::doc! {
                    "personal_info.application_status": value,
                    "modified_at": to_bson(&Utc::now())?,
                },
            )
            .await
    }

    pub async fn set_status(&self, id: &str, status: StudentStatus) -> AppResult<Student> {
        let oid = ObjectId::parse_str(id)?;
        let value = match status {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
        };

        self.students
            .update_fields(
                &oid,
                mongodb::bson::doc! {
                    "personal_info.status": value,
                    "modified_at": to_bson(&Utc::now())?,
                },
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.students.delete(&oid).await
    }
}

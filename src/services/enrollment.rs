//! Class enrollment transitions: batch promotion, per-entry status edits,
//! and reconciliation of denormalized class counts.

use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        Class, ClassHistoryEntry, ClassProgressStatus, Session, Student,
    },
    models::dto::request::{
        AddClassHistoryRequest, PromoteStudentsRequest, UpdateClassStatusRequest,
    },
    models::dto::response::{
        ClassCount, EnrolledStudentsResponse, PromotionFailure, PromotionOutcome, StudentSummary,
        SyncCountsResponse,
    },
    repositories::{ClassRepository, SessionRepository, StudentRepository},
};

pub struct EnrollmentService {
    students: Arc<dyn StudentRepository>,
    classes: Arc<dyn ClassRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl EnrollmentService {
    pub fn new(
        students: Arc<dyn StudentRepository>,
        classes: Arc<dyn ClassRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            students,
            classes,
            sessions,
        }
    }

    /// Promotes a batch of students out of `from_class` into `to_class`.
    ///
    /// Each student is handled independently; a failure is recorded and the
    /// rest of the batch continues. Both class counts are recomputed once at
    /// the end, so a partially failed batch still leaves counts consistent.
    pub async fn promote_students(
        &self,
        request: PromoteStudentsRequest,
    ) -> AppResult<PromotionOutcome> {
        let from_class = self.class_by_name(&request.from_class).await?;
        let to_class = self.class_by_name(&request.to_class).await?;
        let session = self.session_by_name(&request.session).await?;

        let from_class_id = class_id(&from_class)?;
        let to_class_id = class_id(&to_class)?;
        let session_id = session
            .id
            .ok_or_else(|| AppError::InternalError("Session document missing _id".to_string()))?;

        let mut promoted = Vec::new();
        let mut failed = Vec::new();

        for student_id in &request.student_ids {
            match self
                .promote_one(
                    student_id,
                    &from_class_id,
                    &to_class_id,
                    &to_class.class_name,
                    &request.year,
                    &session_id,
                )
                .await
            {
                Ok(()) => promoted.push(student_id.clone()),
                Err(reason) => failed.push(PromotionFailure {
                    id: student_id.clone(),
                    reason,
                }),
            }
        }

        self.recount_class(&from_class_id).await?;
        self.recount_class(&to_class_id).await?;

        log::info!(
            "Promoted {}/{} students from '{}' to '{}'",
            promoted.len(),
            request.student_ids.len(),
            request.from_class,
            request.to_class
        );

        Ok(PromotionOutcome { promoted, failed })
    }

    async fn promote_one(
        &self,
        student_id: &str,
        from_class_id: &ObjectId,
        to_class_id: &ObjectId,
        to_class_name: &str,
        year: &str,
        session_id: &ObjectId,
    ) -> Result<(), String> {
        let oid = ObjectId::parse_str(student_id)
            .map_err(|_| format!("Invalid student id '{}'", student_id))?;

        let mut student = self
            .students
            .find_by_id(&oid)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "Student not found".to_string())?;

        // The passing grade is recorded beforehand via the status-update
        // endpoint; promotion only closes that entry out. A student without
        // one still moves up.
        if let Some(entry) = find_pass_entry_mut(&mut student, from_class_id) {
            entry.is_completed = true;
        }

        student.class_history.push(ClassHistoryEntry::new_in_progress(
            *to_class_id,
            year,
            *session_id,
        ));
        student.personal_info.enrolled_class = Some(to_class_name.to_string());
        student.modified_at = Some(Utc::now());

        self.students
            .replace(&oid, student)
            .await
            .map_err(|e| e.to_string())?;

        Ok(())
    }

    /// Edits one class-history entry. The entry is located by `entry_id`
    /// when given, otherwise the first entry for the named class is used.
    pub async fn update_class_status(
        &self,
        student_id: &ObjectId,
        request: UpdateClassStatusRequest,
    ) -> AppResult<Student> {
        let class = self.class_by_name(&request.class_name).await?;
        let class_oid = class_id(&class)?;

        let mut student = self
            .students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Student with id '{}' not found", student_id))
            })?;

        let entry =
            find_history_entry_any_mut(&mut student, &class_oid, request.entry_id.as_deref())
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "No class history entry for '{}'",
                        request.class_name
                    ))
                })?;

        entry.status = request.status;
        if let Some(result) = request.result {
            entry.result = Some(result);
        }
        if let Some(repeat_count) = request.repeat_count {
            entry.repeat_count = repeat_count;
        }
        if let Some(is_completed) = request.is_completed {
            entry.is_completed = is_completed;
        }

        if request.status == ClassProgressStatus::InProgress {
            student.personal_info.enrolled_class = Some(class.class_name.clone());
        }
        student.modified_at = Some(Utc::now());

        let updated = self.students.replace(student_id, student).await?;
        self.recount_class(&class_oid).await?;

        Ok(updated)
    }

    /// Appends a fresh class-history entry, resolving class and session by
    /// their human-facing names.
    pub async fn add_class_history(
        &self,
        student_id: &ObjectId,
        request: AddClassHistoryRequest,
    ) -> AppResult<Student> {
        let class = self.class_by_name(&request.class_name).await?;
        let class_oid = class_id(&class)?;
        let session = self.session_by_name(&request.session).await?;
        let session_id = session
            .id
            .ok_or_else(|| AppError::InternalError("Session document missing _id".to_string()))?;

        let mut student = self
            .students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Student with id '{}' not found", student_id))
            })?;

        let mut entry = ClassHistoryEntry::new_in_progress(class_oid, &request.year, session_id);
        entry.status = request.status;
        entry.result = request.result;
        entry.repeat_count = request.repeat_count.unwrap_or(0);
        entry.is_completed = request.is_completed.unwrap_or(false);

        if entry.status == ClassProgressStatus::InProgress {
            student.personal_info.enrolled_class = Some(class.class_name.clone());
        }
        student.class_history.push(entry);
        student.modified_at = Some(Utc::now());

        let updated = self.students.replace(student_id, student).await?;
        self.recount_class(&class_oid).await?;

        Ok(updated)
    }

    /// Students currently enrolled in a class, in roll-number order.
    pub async fn enrolled_students(
        &self,
        class_id_str: &str,
    ) -> AppResult<EnrolledStudentsResponse> {
        let class_oid = ObjectId::parse_str(class_id_str)?;
        let class = self
            .classes
            .find_by_id(&class_oid)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Class with id '{}' not found", class_id_str))
            })?;

        let students = self.students.find_enrolled_in_class(&class_oid).await?;
        let summaries: Vec<StudentSummary> = students
            .iter()
            .map(|s| StudentSummary {
                id: s.id.map(|id| id.to_hex()).unwrap_or_default(),
                name: s.full_name(),
                roll_no: s.personal_info.roll_no,
                email: s.personal_info.email.clone(),
            })
            .collect();

        Ok(EnrolledStudentsResponse {
            class,
            total_students: summaries.len(),
            students: summaries,
        })
    }

    /// Recomputes `students_enrolled` for every class from the source of
    /// truth in the users collection. Safe to run repeatedly.
    pub async fn sync_class_counts(&self) -> AppResult<SyncCountsResponse> {
        let classes = self.classes.find_all().await?;
        let mut counts = Vec::with_capacity(classes.len());

        for class in classes {
            let class_oid = class_id(&class)?;
            let count = self.students.count_enrolled_in_class(&class_oid).await? as i64;

            if count != class.students_enrolled {
                self.classes.set_enrolled_count(&class_oid, count).await?;
                log::info!(
                    "Class '{}' enrollment corrected: {} -> {}",
                    class.class_name,
                    class.students_enrolled,
                    count
                );
            }

            counts.push(ClassCount {
                class_id: class_oid.to_hex(),
                class_name: class.class_name,
                students_enrolled: count,
            });
        }

        Ok(SyncCountsResponse {
            classes_updated: counts.len(),
            counts,
        })
    }

    async fn recount_class(&self, class_oid: &ObjectId) -> AppResult<()> {
        let count = self.students.count_enrolled_in_class(class_oid).await? as i64;
        self.classes.set_enrolled_count(class_oid, count).await
    }

    async fn class_by_name(&self, class_name: &str) -> AppResult<Class> {
        self.classes
            .find_by_name(class_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Class '{}' not found", class_name)))
    }

    async fn session_by_name(&self, session_name: &str) -> AppResult<Session> {
        self.sessions
            .find_by_name(session_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session '{}' not found", session_name)))
    }
}

fn class_id(class: &Class) -> AppResult<ObjectId> {
    class
        .id
        .ok_or_else(|| AppError::InternalError("Class document missing _id".to_string()))
}

/// First entry for the class already marked `pass`, in array order.
fn find_pass_entry_mut<'a>(
    student: &'a mut Student,
    class_id: &ObjectId,
) -> Option<&'a mut ClassHistoryEntry> {
    student
        .class_history
        .iter_mut()
        .find(|e| e.class_id == *class_id && e.status == ClassProgressStatus::Pass)
}

/// Entry lookup matching any status; used when an admin corrects a past
/// entry.
fn find_history_entry_any_mut<'a>(
    student: &'a mut Student,
    class_id: &ObjectId,
    entry_id: Option<&str>,
) -> Option<&'a mut ClassHistoryEntry> {
    match entry_id {
        Some(id) => student
            .class_history
            .iter_mut()
            .find(|e| e.entry_id == id && e.class_id == *class_id),
        None => student
            .class_history
            .iter_mut()
            .find(|e| e.class_id == *class_id),
    }
}

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use tokio::sync::RwLock;

use madrassa_server::{
    errors::{AppError, AppResult},
    models::domain::{
        ApplicationStatus, Class, ClassHistoryEntry, ClassProgressStatus, PersonalInfo, Session,
        Student, StudentStatus,
    },
    models::dto::request::{PromoteStudentsRequest, UpdateClassStatusRequest},
    repositories::{ClassRepository, SessionRepository, StudentRepository},
    services::EnrollmentService,
};

struct InMemoryStudentRepository {
    students: Arc<RwLock<HashMap<ObjectId, Student>>>,
}

impl InMemoryStudentRepository {
    fn new() -> Self {
        Self {
            students: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn is_enrolled(student: &Student, class_id: &ObjectId) -> bool {
        student.personal_info.verified
            && student.personal_info.status == StudentStatus::Active
            && student.personal_info.application_status == ApplicationStatus::Accepted
            && student.class_history.iter().any(|e| {
                e.class_id == *class_id && e.status == ClassProgressStatus::InProgress
            })
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn create(&self, student: Student) -> AppResult<Student> {
        let id = student
            .id
            .ok_or_else(|| AppError::InternalError("Student missing _id".to_string()))?;
        self.students.write().await.insert(id, student.clone());
        Ok(student)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Student>> {
        Ok(self.students.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Student>> {
        Ok(self
            .students
            .read()
            .await
            .values()
            .find(|s| s.personal_info.email == email)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Student>> {
        Ok(self.students.read().await.values().cloned().collect())
    }

    async fn update_fields(&self, _id: &ObjectId, _fields: Document) -> AppResult<Student> {
        Err(AppError::InternalError(
            "update_fields is not supported by the in-memory repository".to_string(),
        ))
    }

    async fn replace(&self, id: &ObjectId, student: Student) -> AppResult<Student> {
        let mut students = self.students.write().await;
        if !students.contains_key(id) {
            return Err(AppError::NotFound(format!(
                "Student with id '{}' not found",
                id
            )));
        }
        students.insert(*id, student.clone());
        Ok(student)
    }

    async fn push_class_history(&self, id: &ObjectId, entry: ClassHistoryEntry) -> AppResult<()> {
        let mut students = self.students.write().await;
        let student = students
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Student with id '{}' not found", id)))?;
        student.class_history.push(entry);
        Ok(())
    }

    async fn find_enrolled_in_class(&self, class_id: &ObjectId) -> AppResult<Vec<Student>> {
        let students = self.students.read().await;
        let mut enrolled: Vec<Student> = students
            .values()
            .filter(|s| Self::is_enrolled(s, class_id))
            .cloned()
            .collect();
        enrolled.sort_by_key(|s| s.personal_info.roll_no);
        Ok(enrolled)
    }

    async fn count_enrolled_in_class(&self, class_id: &ObjectId) -> AppResult<u64> {
        let students = self.students.read().await;
        Ok(students
            .values()
            .filter(|s| Self::is_enrolled(s, class_id))
            .count() as u64)
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        self.students
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Student with id '{}' not found", id)))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

struct InMemoryClassRepository {
    classes: Arc<RwLock<HashMap<ObjectId, Class>>>,
}

impl InMemoryClassRepository {
    fn new() -> Self {
        Self {
            classes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ClassRepository for InMemoryClassRepository {
    async fn create(&self, class: Class) -> AppResult<Class> {
        let id = class
            .id
            .ok_or_else(|| AppError::InternalError("Class missing _id".to_string()))?;
        self.classes.write().await.insert(id, class.clone());
        Ok(class)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Class>> {
        Ok(self.classes.read().await.get(id).cloned())
    }

    async fn find_by_name(&self, class_name: &str) -> AppResult<Option<Class>> {
        Ok(self
            .classes
            .read()
            .await
            .values()
            .find(|c| c.class_name == class_name)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Class>> {
        let mut classes: Vec<Class> = self.classes.read().await.values().cloned().collect();
        classes.sort_by(|a, b| a.class_name.cmp(&b.class_name));
        Ok(classes)
    }

    async fn update_fields(&self, _id: &ObjectId, _fields: Document) -> AppResult<Class> {
        Err(AppError::InternalError(
            "update_fields is not supported by the in-memory repository".to_string(),
        ))
    }

    async fn set_enrolled_count(&self, id: &ObjectId, count: i64) -> AppResult<()> {
        let mut classes = self.classes.write().await;
        let class = classes
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Class with id '{}' not found", id)))?;
        class.students_enrolled = count;
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        self.classes
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Class with id '{}' not found", id)))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<ObjectId, Session>>>,
}

impl InMemorySessionRepository {
    fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> AppResult<Session> {
        let id = session
            .id
            .ok_or_else(|| AppError::InternalError("Session missing _id".to_string()))?;
        self.sessions.write().await.insert(id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Session>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn find_by_name(&self, session_name: &str) -> AppResult<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .find(|s| s.session_name == session_name)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Session>> {
        Ok(self.sessions.read().await.values().cloned().collect())
    }

    async fn find_active(&self) -> AppResult<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .find(|s| s.is_active)
            .cloned())
    }

    async fn deactivate_all(&self) -> AppResult<()> {
        for session in self.sessions.write().await.values_mut() {
            session.is_active = false;
        }
        Ok(())
    }

    async fn set_active(&self, id: &ObjectId, active: bool) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))?;
        session.is_active = active;
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

struct Fixture {
    students: Arc<InMemoryStudentRepository>,
    classes: Arc<InMemoryClassRepository>,
    service: EnrollmentService,
    awwal: Class,
    doam: Class,
    session: Session,
}

async fn fixture() -> Fixture {
    let students = Arc::new(InMemoryStudentRepository::new());
    let classes = Arc::new(InMemoryClassRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());

    let awwal = classes
        .create(Class::new("Awwal", Some("Ustad Kazim".to_string()), None, None))
        .await
        .unwrap();
    let doam = classes.create(Class::new("Doam", None, None, None)).await.unwrap();
    let session = sessions.create(Session::new("2025-2026")).await.unwrap();

    let service = EnrollmentService::new(students.clone(), classes.clone(), sessions.clone());

    Fixture {
        students,
        classes,
        service,
        awwal,
        doam,
        session,
    }
}

fn enrolled_student(roll_no: i64, class_id: ObjectId, session_id: ObjectId) -> Student {
    Student {
        id: Some(ObjectId::new()),
        personal_info: PersonalInfo {
            first_name: format!("Student{}", roll_no),
            last_name: "Khan".to_string(),
            father_name: None,
            gender: None,
            email: format!("student{}@example.com", roll_no),
            whatsapp_no: None,
            dob: None,
            age: Some(12),
            address: None,
            city: None,
            country: None,
            enrolled_year: Some("2024".to_string()),
            roll_no,
            verified: true,
            status: StudentStatus::Active,
            application_status: ApplicationStatus::Accepted,
            enrolled_class: Some("Awwal".to_string()),
        },
        guardian_info: None,
        class_history: vec![ClassHistoryEntry::new_in_progress(
            class_id, "2024", session_id,
        )],
        created_at: None,
        modified_at: None,
    }
}

/// A student whose source-class entry has already been marked `pass`, the
/// state promotion normally finds them in.
fn passed_student(roll_no: i64, class_id: ObjectId, session_id: ObjectId) -> Student {
    let mut student = enrolled_student(roll_no, class_id, session_id);
    student.class_history[0].status = ClassProgressStatus::Pass;
    student.class_history[0].result = Some("82%".to_string());
    student
}

fn promote_request(student_ids: Vec<String>) -> PromoteStudentsRequest {
    PromoteStudentsRequest {
        student_ids,
        from_class: "Awwal".to_string(),
        to_class: "Doam".to_string(),
        year: "2025".to_string(),
        session: "2025-2026".to_string(),
    }
}

#[tokio::test]
async fn promotion_moves_history_and_enrolled_class() {
    let fx = fixture().await;
    let awwal_id = fx.awwal.id.unwrap();
    let session_id = fx.session.id.unwrap();

    let student = fx
        .students
        .create(passed_student(1, awwal_id, session_id))
        .await
        .unwrap();
    let student_id = student.id.unwrap();

    let outcome = fx
        .service
        .promote_students(promote_request(vec![student_id.to_hex()]))
        .await
        .unwrap();

    assert_eq!(outcome.promoted, vec![student_id.to_hex()]);
    assert!(outcome.failed.is_empty());

    let updated = fx.students.find_by_id(&student_id).await.unwrap().unwrap();
    assert_eq!(updated.class_history.len(), 2);

    // The pass entry is closed out, not rewritten.
    let old_entry = &updated.class_history[0];
    assert_eq!(old_entry.status, ClassProgressStatus::Pass);
    assert_eq!(old_entry.result.as_deref(), Some("82%"));
    assert!(old_entry.is_completed);

    let new_entry = &updated.class_history[1];
    assert_eq!(new_entry.class_id, fx.doam.id.unwrap());
    assert_eq!(new_entry.status, ClassProgressStatus::InProgress);
    assert_eq!(new_entry.year, "2025");
    assert!(!new_entry.is_completed);

    assert_eq!(
        updated.personal_info.enrolled_class.as_deref(),
        Some("Doam")
    );
}

#[tokio::test]
async fn partial_failure_keeps_rest_of_batch_and_counts() {
    let fx = fixture().await;
    let awwal_id = fx.awwal.id.unwrap();
    let doam_id = fx.doam.id.unwrap();
    let session_id = fx.session.id.unwrap();

    let a = fx
        .students
        .create(passed_student(1, awwal_id, session_id))
        .await
        .unwrap();
    let b = fx
        .students
        .create(passed_student(2, awwal_id, session_id))
        .await
        .unwrap();
    let missing = ObjectId::new();

    let outcome = fx
        .service
        .promote_students(promote_request(vec![
            a.id.unwrap().to_hex(),
            missing.to_hex(),
            b.id.unwrap().to_hex(),
        ]))
        .await
        .unwrap();

    assert_eq!(outcome.promoted.len(), 2);
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].id, missing.to_hex());
    assert!(outcome.failed[0].reason.contains("not found"));

    // Both class counts were recomputed after the batch.
    let awwal = fx.classes.find_by_id(&awwal_id).await.unwrap().unwrap();
    let doam = fx.classes.find_by_id(&doam_id).await.unwrap().unwrap();
    assert_eq!(awwal.students_enrolled, 0);
    assert_eq!(doam.students_enrolled, 2);
}

#[tokio::test]
async fn malformed_ids_fail_while_others_proceed() {
    let fx = fixture().await;
    let doam_id = fx.doam.id.unwrap();
    let session_id = fx.session.id.unwrap();

    // No history in the source class at all; promotion still applies.
    let elsewhere = fx
        .students
        .create(enrolled_student(3, doam_id, session_id))
        .await
        .unwrap();
    let elsewhere_id = elsewhere.id.unwrap();

    let outcome = fx
        .service
        .promote_students(promote_request(vec![
            "not-an-object-id".to_string(),
            elsewhere_id.to_hex(),
        ]))
        .await
        .unwrap();

    assert_eq!(outcome.promoted, vec![elsewhere_id.to_hex()]);
    assert_eq!(outcome.failed.len(), 1);
    assert!(outcome.failed[0].reason.contains("Invalid student id"));

    let updated = fx.students.find_by_id(&elsewhere_id).await.unwrap().unwrap();
    assert_eq!(updated.class_history.len(), 2);
    assert_eq!(updated.class_history[1].class_id, doam_id);
    assert_eq!(
        updated.personal_info.enrolled_class.as_deref(),
        Some("Doam")
    );
}

#[tokio::test]
async fn promotion_leaves_an_open_source_entry_untouched() {
    let fx = fixture().await;
    let awwal_id = fx.awwal.id.unwrap();
    let session_id = fx.session.id.unwrap();

    // Never marked pass; the entry must not be rewritten by promotion.
    let student = fx
        .students
        .create(enrolled_student(4, awwal_id, session_id))
        .await
        .unwrap();
    let student_id = student.id.unwrap();

    let outcome = fx
        .service
        .promote_students(promote_request(vec![student_id.to_hex()]))
        .await
        .unwrap();

    assert_eq!(outcome.promoted, vec![student_id.to_hex()]);
    assert!(outcome.failed.is_empty());

    let updated = fx.students.find_by_id(&student_id).await.unwrap().unwrap();
    assert_eq!(updated.class_history.len(), 2);

    let old_entry = &updated.class_history[0];
    assert_eq!(old_entry.status, ClassProgressStatus::InProgress);
    assert!(!old_entry.is_completed);

    assert_eq!(
        updated.class_history[1].class_id,
        fx.doam.id.unwrap()
    );
}

#[tokio::test]
async fn promotion_to_unknown_class_is_not_found() {
    let fx = fixture().await;

    let mut request = promote_request(vec![ObjectId::new().to_hex()]);
    request.to_class = "Nonexistent".to_string();

    let err = fx.service.promote_students(request).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn sync_class_counts_corrects_drift_and_is_idempotent() {
    let fx = fixture().await;
    let awwal_id = fx.awwal.id.unwrap();
    let session_id = fx.session.id.unwrap();

    fx.students
        .create(enrolled_student(1, awwal_id, session_id))
        .await
        .unwrap();
    fx.students
        .create(enrolled_student(2, awwal_id, session_id))
        .await
        .unwrap();

    // Drift the denormalized counter.
    fx.classes.set_enrolled_count(&awwal_id, 99).await.unwrap();

    let response = fx.service.sync_class_counts().await.unwrap();
    assert_eq!(response.classes_updated, 2);

    let awwal_count = response
        .counts
        .iter()
        .find(|c| c.class_name == "Awwal")
        .unwrap();
    assert_eq!(awwal_count.students_enrolled, 2);

    let awwal = fx.classes.find_by_id(&awwal_id).await.unwrap().unwrap();
    assert_eq!(awwal.students_enrolled, 2);

    // Running again changes nothing.
    let again = fx.service.sync_class_counts().await.unwrap();
    let awwal_again = again.counts.iter().find(|c| c.class_name == "Awwal").unwrap();
    assert_eq!(awwal_again.students_enrolled, 2);
}

#[tokio::test]
async fn update_class_status_targets_entry_by_id() {
    let fx = fixture().await;
    let awwal_id = fx.awwal.id.unwrap();
    let session_id = fx.session.id.unwrap();

    // A repeat year: two history entries against the same class.
    let mut student = enrolled_student(5, awwal_id, session_id);
    student.class_history[0].status = ClassProgressStatus::Fail;
    student.class_history[0].is_completed = true;
    student
        .class_history
        .push(ClassHistoryEntry::new_in_progress(
            awwal_id, "2025", session_id,
        ));
    let repeat_entry_id = student.class_history[1].entry_id.clone();

    let student = fx.students.create(student).await.unwrap();
    let student_id = student.id.unwrap();

    let updated = fx
        .service
        .update_class_status(
            &student_id,
            UpdateClassStatusRequest {
                class_name: "Awwal".to_string(),
                entry_id: Some(repeat_entry_id.clone()),
                status: ClassProgressStatus::Pass,
                result: Some("78%".to_string()),
                repeat_count: Some(1),
                is_completed: Some(true),
            },
        )
        .await
        .unwrap();

    let first = &updated.class_history[0];
    assert_eq!(first.status, ClassProgressStatus::Fail);

    let second = &updated.class_history[1];
    assert_eq!(second.entry_id, repeat_entry_id);
    assert_eq!(second.status, ClassProgressStatus::Pass);
    assert_eq!(second.result.as_deref(), Some("78%"));
    assert_eq!(second.repeat_count, 1);
    assert!(second.is_completed);
}

#[tokio::test]
async fn enrolled_students_are_listed_in_roll_order() {
    let fx = fixture().await;
    let awwal_id = fx.awwal.id.unwrap();
    let session_id = fx.session.id.unwrap();

    fx.students
        .create(enrolled_student(7, awwal_id, session_id))
        .await
        .unwrap();
    fx.students
        .create(enrolled_student(2, awwal_id, session_id))
        .await
        .unwrap();

    // Unverified students are not counted as enrolled.
    let mut unverified = enrolled_student(1, awwal_id, session_id);
    unverified.personal_info.verified = false;
    fx.students.create(unverified).await.unwrap();

    let response = fx
        .service
        .enrolled_students(&awwal_id.to_hex())
        .await
        .unwrap();

    assert_eq!(response.total_students, 2);
    let rolls: Vec<i64> = response.students.iter().map(|s| s.roll_no).collect();
    assert_eq!(rolls, vec![2, 7]);
}

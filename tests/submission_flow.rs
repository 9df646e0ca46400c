use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use mongodb::bson::{oid::ObjectId, Document};
use tokio::sync::RwLock;

use madrassa_server::{
    errors::{AppError, AppResult},
    models::domain::{
        ApplicationStatus, Assignment, AssignmentStatus, AssignmentSubmission, AttemptStatus,
        ClassHistoryEntry, PersonalInfo, Question, QuestionOption, QuestionType, Quiz,
        QuizAttempt, QuizStatus, Student, StudentStatus, SubmissionStatus,
    },
    models::dto::request::{
        AnswerInput, GradedAnswerInput, ManualGradeRequest, StartQuizAttemptRequest,
        SubmitAssignmentRequest, SubmitQuizAttemptRequest,
    },
    repositories::{
        AssignmentRepository, QuizAttemptRepository, QuizRepository, StudentRepository,
        SubmissionRepository,
    },
    services::{QuizAttemptService, SubmissionService},
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
        self.students.write().await.insert(*id, student.clone());
        Ok(student)
    }

    async fn push_class_history(&self, _id: &ObjectId, _entry: ClassHistoryEntry) -> AppResult<()> {
        Ok(())
    }

    async fn find_enrolled_in_class(&self, _class_id: &ObjectId) -> AppResult<Vec<Student>> {
        Ok(vec![])
    }

    async fn count_enrolled_in_class(&self, _class_id: &ObjectId) -> AppResult<u64> {
        Ok(0)
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

struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<ObjectId, Quiz>>>,
}

impl InMemoryQuizRepository {
    fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let id = quiz
            .id
            .ok_or_else(|| AppError::InternalError("Quiz missing _id".to_string()))?;
        self.quizzes.write().await.insert(id, quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Quiz>> {
        Ok(self
            .quizzes
            .read()
            .await
            .get(id)
            .filter(|q| q.is_active)
            .cloned())
    }

    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        status: Option<QuizStatus>,
    ) -> AppResult<Vec<Quiz>> {
        Ok(self
            .quizzes
            .read()
            .await
            .values()
            .filter(|q| q.is_active)
            .filter(|q| class_id.map_or(true, |c| q.class_id == *c))
            .filter(|q| status.map_or(true, |s| q.status == s))
            .cloned()
            .collect())
    }

    async fn find_published_for_class(&self, class_id: &ObjectId) -> AppResult<Vec<Quiz>> {
        Ok(self
            .quizzes
            .read()
            .await
            .values()
            .filter(|q| {
                q.is_active
                    && q.class_id == *class_id
                    && matches!(q.status, QuizStatus::Published | QuizStatus::Ongoing)
            })
            .cloned()
            .collect())
    }

    async fn update_fields(&self, _id: &ObjectId, _fields: Document) -> AppResult<Quiz> {
        Err(AppError::InternalError(
            "update_fields is not supported by the in-memory repository".to_string(),
        ))
    }

    async fn set_status(&self, id: &ObjectId, status: QuizStatus) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        let quiz = quizzes
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;
        quiz.status = status;
        Ok(quiz.clone())
    }

    async fn soft_delete(&self, id: &ObjectId) -> AppResult<()> {
        let mut quizzes = self.quizzes.write().await;
        let quiz = quizzes
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))?;
        quiz.is_active = false;
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

struct InMemoryQuizAttemptRepository {
    attempts: Arc<RwLock<HashMap<ObjectId, QuizAttempt>>>,
}

impl InMemoryQuizAttemptRepository {
    fn new() -> Self {
        Self {
            attempts: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let id = attempt
            .id
            .ok_or_else(|| AppError::InternalError("Attempt missing _id".to_string()))?;
        self.attempts.write().await.insert(id, attempt.clone());
        Ok(attempt)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<QuizAttempt>> {
        Ok(self.attempts.read().await.get(id).cloned())
    }

    async fn find_active(
        &self,
        quiz_id: &ObjectId,
        student_id: &ObjectId,
    ) -> AppResult<Option<QuizAttempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .find(|a| a.quiz_id == *quiz_id && a.student_id == *student_id && a.is_active)
            .cloned())
    }

    async fn find_by_quiz(&self, quiz_id: &ObjectId) -> AppResult<Vec<QuizAttempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| a.quiz_id == *quiz_id && a.is_active)
            .cloned()
            .collect())
    }

    async fn find_by_student(&self, student_id: &ObjectId) -> AppResult<Vec<QuizAttempt>> {
        Ok(self
            .attempts
            .read()
            .await
            .values()
            .filter(|a| a.student_id == *student_id && a.is_active)
            .cloned()
            .collect())
    }

    async fn update(&self, id: &ObjectId, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let mut attempts = self.attempts.write().await;
        if !attempts.contains_key(id) {
            return Err(AppError::NotFound(format!(
                "Quiz attempt with id '{}' not found",
                id
            )));
        }
        attempts.insert(*id, attempt.clone());
        Ok(attempt)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

struct InMemoryAssignmentRepository {
    assignments: Arc<RwLock<HashMap<ObjectId, Assignment>>>,
}

impl InMemoryAssignmentRepository {
    fn new() -> Self {
        Self {
            assignments: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn create(&self, assignment: Assignment) -> AppResult<Assignment> {
        let id = assignment
            .id
            .ok_or_else(|| AppError::InternalError("Assignment missing _id".to_string()))?;
        self.assignments.write().await.insert(id, assignment.clone());
        Ok(assignment)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<Assignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .get(id)
            .filter(|a| a.is_active)
            .cloned())
    }

    async fn find_all(
        &self,
        class_id: Option<&ObjectId>,
        week_number: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<Assignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| a.is_active)
            .filter(|a| class_id.map_or(true, |c| a.class_id == *c))
            .filter(|a| week_number.map_or(true, |w| a.week_number == w))
            .filter(|a| year.map_or(true, |y| a.year == y))
            .cloned()
            .collect())
    }

    async fn find_published_for_class(&self, class_id: &ObjectId) -> AppResult<Vec<Assignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .values()
            .filter(|a| {
                a.is_active && a.class_id == *class_id && a.status == AssignmentStatus::Published
            })
            .cloned()
            .collect())
    }

    async fn update_fields(&self, _id: &ObjectId, _fields: Document) -> AppResult<Assignment> {
        Err(AppError::InternalError(
            "update_fields is not supported by the in-memory repository".to_string(),
        ))
    }

    async fn set_status(&self, id: &ObjectId, status: AssignmentStatus) -> AppResult<Assignment> {
        let mut assignments = self.assignments.write().await;
        let assignment = assignments
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Assignment with id '{}' not found", id)))?;
        assignment.status = status;
        Ok(assignment.clone())
    }

    async fn soft_delete(&self, id: &ObjectId) -> AppResult<()> {
        let mut assignments = self.assignments.write().await;
        let assignment = assignments
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Assignment with id '{}' not found", id)))?;
        assignment.is_active = false;
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

struct InMemorySubmissionRepository {
    submissions: Arc<RwLock<HashMap<ObjectId, AssignmentSubmission>>>,
}

impl InMemorySubmissionRepository {
    fn new() -> Self {
        Self {
            submissions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create(&self, submission: AssignmentSubmission) -> AppResult<AssignmentSubmission> {
        let id = submission
            .id
            .ok_or_else(|| AppError::InternalError("Submission missing _id".to_string()))?;
        self.submissions.write().await.insert(id, submission.clone());
        Ok(submission)
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<AssignmentSubmission>> {
        Ok(self.submissions.read().await.get(id).cloned())
    }

    async fn find_active(
        &self,
        assignment_id: &ObjectId,
        student_id: &ObjectId,
    ) -> AppResult<Option<AssignmentSubmission>> {
        Ok(self
            .submissions
            .read()
            .await
            .values()
            .find(|s| {
                s.assignment_id == *assignment_id && s.student_id == *student_id && s.is_active
            })
            .cloned())
    }

    async fn find_by_assignment(
        &self,
        assignment_id: &ObjectId,
    ) -> AppResult<Vec<AssignmentSubmission>> {
        Ok(self
            .submissions
            .read()
            .await
            .values()
            .filter(|s| s.assignment_id == *assignment_id && s.is_active)
            .cloned()
            .collect())
    }

    async fn find_by_student(
        &self,
        student_id: &ObjectId,
    ) -> AppResult<Vec<AssignmentSubmission>> {
        Ok(self
            .submissions
            .read()
            .await
            .values()
            .filter(|s| s.student_id == *student_id && s.is_active)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &ObjectId,
        submission: AssignmentSubmission,
    ) -> AppResult<AssignmentSubmission> {
        let mut submissions = self.submissions.write().await;
        if !submissions.contains_key(id) {
            return Err(AppError::NotFound(format!(
                "Submission with id '{}' not found",
                id
            )));
        }
        submissions.insert(*id, submission.clone());
        Ok(submission)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

fn sample_student() -> Student {
    Student {
        id: Some(ObjectId::new()),
        personal_info: PersonalInfo {
            first_name: "Ayesha".to_string(),
            last_name: "Siddiqui".to_string(),
            father_name: None,
            gender: None,
            email: "ayesha@example.com".to_string(),
            whatsapp_no: None,
            dob: None,
            age: Some(14),
            address: None,
            city: None,
            country: None,
            enrolled_year: Some("2024".to_string()),
            roll_no: 11,
            verified: true,
            status: StudentStatus::Active,
            application_status: ApplicationStatus::Accepted,
            enrolled_class: Some("Awwal".to_string()),
        },
        guardian_info: None,
        class_history: vec![],
        created_at: None,
        modified_at: None,
    }
}

/// TF(5) + MC(5) + essay(10), with stable ids for answering.
fn sample_questions() -> Vec<Question> {
    vec![
        Question {
            id: "q-tf".to_string(),
            question_text: "Wudu is required before salah.".to_string(),
            question_type: QuestionType::TrueFalse,
            options: vec![],
            correct_answer: Some("true".to_string()),
            marks: 5,
        },
        Question {
            id: "q-mc".to_string(),
            question_text: "How many rakat in Fajr?".to_string(),
            question_type: QuestionType::MultipleChoice,
            options: vec![
                QuestionOption {
                    id: "opt-two".to_string(),
                    option_text: "Two".to_string(),
                    is_correct: true,
                },
                QuestionOption {
                    id: "opt-four".to_string(),
                    option_text: "Four".to_string(),
                    is_correct: false,
                },
            ],
            correct_answer: None,
            marks: 5,
        },
        Question {
            id: "q-essay".to_string(),
            question_text: "Explain the conditions of zakat.".to_string(),
            question_type: QuestionType::Essay,
            options: vec![],
            correct_answer: None,
            marks: 10,
        },
    ]
}

fn open_quiz() -> Quiz {
    let mut quiz = Quiz {
        id: Some(ObjectId::new()),
        title: "Fiqh weekly".to_string(),
        description: "Weekly check".to_string(),
        class_id: ObjectId::new(),
        class_name: "Awwal".to_string(),
        subject: "Fiqh".to_string(),
        quiz_date: Utc::now() + Duration::days(1),
        start_time: "10:00".to_string(),
        end_time: "23:00".to_string(),
        duration: 30,
        total_marks: 0,
        passing_marks: 40,
        questions: sample_questions(),
        status: QuizStatus::Published,
        created_by: None,
        is_active: true,
        created_at: Some(Utc::now()),
        modified_at: Some(Utc::now()),
    };
    quiz.recompute_total_marks();
    quiz
}

fn open_assignment() -> Assignment {
    let mut assignment = Assignment {
        id: Some(ObjectId::new()),
        title: "Surah memorization".to_string(),
        description: "Memorize and answer".to_string(),
        class_id: ObjectId::new(),
        class_name: "Awwal".to_string(),
        subject: "Quran".to_string(),
        due_date: Utc::now() + Duration::days(3),
        end_time: "17:00".to_string(),
        total_marks: 0,
        status: AssignmentStatus::Published,
        week_number: 14,
        year: 2025,
        questions: sample_questions(),
        attachments: vec![],
        created_by: None,
        is_active: true,
        created_at: None,
        modified_at: None,
    };
    assignment.recompute_total_marks();
    assignment
}

fn answer(question_id: &str, text: &str, selected: Option<&str>) -> AnswerInput {
    AnswerInput {
        question_id: question_id.to_string(),
        answer: text.to_string(),
        selected_option: selected.map(str::to_string),
    }
}

struct QuizFixture {
    service: QuizAttemptService,
    quizzes: Arc<InMemoryQuizRepository>,
    student_id: ObjectId,
}

async fn quiz_fixture() -> QuizFixture {
    let attempts = Arc::new(InMemoryQuizAttemptRepository::new());
    let quizzes = Arc::new(InMemoryQuizRepository::new());
    let students = Arc::new(InMemoryStudentRepository::new());

    let student = students.create(sample_student()).await.unwrap();

    QuizFixture {
        service: QuizAttemptService::new(attempts, quizzes.clone(), students),
        quizzes,
        student_id: student.id.unwrap(),
    }
}

#[tokio::test]
async fn submitting_grades_objective_questions_only() {
    let fx = quiz_fixture().await;
    let quiz = fx.quizzes.create(open_quiz()).await.unwrap();

    let attempt = fx
        .service
        .submit(SubmitQuizAttemptRequest {
            quiz_id: quiz.id.unwrap().to_hex(),
            student_id: fx.student_id.to_hex(),
            answers: vec![
                answer("q-tf", " TRUE ", None),
                answer("q-mc", "", Some("opt-two")),
                answer("q-essay", "Zakat requires nisab...", None),
            ],
            time_taken: Some(12),
        })
        .await
        .unwrap();

    assert_eq!(attempt.status, AttemptStatus::Submitted);
    assert_eq!(attempt.total_marks_obtained, 10);
    assert_eq!(attempt.percentage, 50.0);
    assert!(attempt.passed); // 50% against a passing mark of 40
    assert!(attempt.submitted_at.is_some());
    assert_eq!(attempt.time_taken, 12);

    let essay = attempt
        .answers
        .iter()
        .find(|a| a.question_id == "q-essay")
        .unwrap();
    assert!(essay.is_correct.is_none());
    assert_eq!(essay.marks_obtained, 0);
}

#[tokio::test]
async fn second_submission_is_a_conflict() {
    let fx = quiz_fixture().await;
    let quiz = fx.quizzes.create(open_quiz()).await.unwrap();

    let request = SubmitQuizAttemptRequest {
        quiz_id: quiz.id.unwrap().to_hex(),
        student_id: fx.student_id.to_hex(),
        answers: vec![answer("q-tf", "true", None)],
        time_taken: None,
    };

    fx.service.submit(request.clone()).await.unwrap();
    let err = fx.service.submit(request).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyExists(_)));
}

#[tokio::test]
async fn draft_quiz_rejects_attempts() {
    let fx = quiz_fixture().await;
    let mut quiz = open_quiz();
    quiz.status = QuizStatus::Draft;
    let quiz = fx.quizzes.create(quiz).await.unwrap();

    let err = fx
        .service
        .start(StartQuizAttemptRequest {
            quiz_id: quiz.id.unwrap().to_hex(),
            student_id: fx.student_id.to_hex(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn expired_quiz_rejects_new_attempts() {
    let fx = quiz_fixture().await;
    let mut quiz = open_quiz();
    quiz.quiz_date = Utc::now() - Duration::days(2);
    let quiz = fx.quizzes.create(quiz).await.unwrap();

    let err = fx
        .service
        .start(StartQuizAttemptRequest {
            quiz_id: quiz.id.unwrap().to_hex(),
            student_id: fx.student_id.to_hex(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn manual_grading_completes_the_attempt() {
    let fx = quiz_fixture().await;
    let quiz = fx.quizzes.create(open_quiz()).await.unwrap();
    let grader = ObjectId::new();

    let attempt = fx
        .service
        .submit(SubmitQuizAttemptRequest {
            quiz_id: quiz.id.unwrap().to_hex(),
            student_id: fx.student_id.to_hex(),
            answers: vec![
                answer("q-tf", "true", None),
                answer("q-essay", "Zakat requires...", None),
            ],
            time_taken: None,
        })
        .await
        .unwrap();

    let graded = fx
        .service
        .grade(
            &attempt.id.unwrap().to_hex(),
            ManualGradeRequest {
                answers: vec![GradedAnswerInput {
                    question_id: "q-essay".to_string(),
                    answer: "Zakat requires...".to_string(),
                    selected_option: None,
                    is_correct: Some(true),
                    marks_obtained: 8,
                }],
                total_marks_obtained: 13,
                feedback: Some("Good explanation".to_string()),
                graded_by: grader.to_hex(),
            },
        )
        .await
        .unwrap();

    assert_eq!(graded.status, AttemptStatus::Graded);
    assert_eq!(graded.total_marks_obtained, 13);
    assert_eq!(graded.percentage, 65.0);
    assert!(graded.passed);
    assert_eq!(graded.graded_by, Some(grader));
    assert!(graded.graded_at.is_some());
}

#[tokio::test]
async fn grading_an_unsubmitted_attempt_is_rejected() {
    let fx = quiz_fixture().await;
    let quiz = fx.quizzes.create(open_quiz()).await.unwrap();

    let attempt = fx
        .service
        .start(StartQuizAttemptRequest {
            quiz_id: quiz.id.unwrap().to_hex(),
            student_id: fx.student_id.to_hex(),
        })
        .await
        .unwrap();

    let err = fx
        .service
        .grade(
            &attempt.id.unwrap().to_hex(),
            ManualGradeRequest {
                answers: vec![],
                total_marks_obtained: 0,
                feedback: None,
                graded_by: ObjectId::new().to_hex(),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

struct AssignmentFixture {
    service: SubmissionService,
    assignments: Arc<InMemoryAssignmentRepository>,
    student_id: ObjectId,
}

async fn assignment_fixture() -> AssignmentFixture {
    let submissions = Arc::new(InMemorySubmissionRepository::new());
    let assignments = Arc::new(InMemoryAssignmentRepository::new());
    let students = Arc::new(InMemoryStudentRepository::new());

    let student = students.create(sample_student()).await.unwrap();

    AssignmentFixture {
        service: SubmissionService::new(submissions, assignments.clone(), students),
        assignments,
        student_id: student.id.unwrap(),
    }
}

fn submit_request(assignment_id: &ObjectId, student_id: &ObjectId) -> SubmitAssignmentRequest {
    SubmitAssignmentRequest {
        assignment_id: assignment_id.to_hex(),
        student_id: student_id.to_hex(),
        answers: vec![
            answer("q-tf", "true", None),
            answer("q-mc", "", Some("opt-four")),
        ],
        attachments: vec![],
    }
}

#[tokio::test]
async fn on_time_submission_is_graded_and_flagged_submitted() {
    let fx = assignment_fixture().await;
    let assignment = fx.assignments.create(open_assignment()).await.unwrap();

    let submission = fx
        .service
        .submit(submit_request(&assignment.id.unwrap(), &fx.student_id))
        .await
        .unwrap();

    assert_eq!(submission.status, SubmissionStatus::Submitted);
    // TF correct, MC wrong option.
    assert_eq!(submission.total_marks_obtained, 5);
    assert_eq!(submission.student_name, "Ayesha Siddiqui");
}

#[tokio::test]
async fn late_submission_is_accepted_and_flagged() {
    let fx = assignment_fixture().await;
    let mut assignment = open_assignment();
    assignment.due_date = Utc::now() - Duration::days(1);
    let assignment = fx.assignments.create(assignment).await.unwrap();

    let submission = fx
        .service
        .submit(submit_request(&assignment.id.unwrap(), &fx.student_id))
        .await
        .unwrap();

    assert_eq!(submission.status, SubmissionStatus::Late);
}

#[tokio::test]
async fn duplicate_assignment_submission_is_a_conflict() {
    let fx = assignment_fixture().await;
    let assignment = fx.assignments.create(open_assignment()).await.unwrap();
    let assignment_id = assignment.id.unwrap();

    fx.service
        .submit(submit_request(&assignment_id, &fx.student_id))
        .await
        .unwrap();

    let err = fx
        .service
        .submit(submit_request(&assignment_id, &fx.student_id))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AlreadyExists(_)));
}

#[tokio::test]
async fn draft_assignment_rejects_submissions() {
    let fx = assignment_fixture().await;
    let mut assignment = open_assignment();
    assignment.status = AssignmentStatus::Draft;
    let assignment = fx.assignments.create(assignment).await.unwrap();

    let err = fx
        .service
        .submit(submit_request(&assignment.id.unwrap(), &fx.student_id))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn manual_grading_marks_submission_graded() {
    let fx = assignment_fixture().await;
    let assignment = fx.assignments.create(open_assignment()).await.unwrap();

    let submission = fx
        .service
        .submit(submit_request(&assignment.id.unwrap(), &fx.student_id))
        .await
        .unwrap();

    let graded = fx
        .service
        .grade(
            &submission.id.unwrap().to_hex(),
            ManualGradeRequest {
                answers: vec![GradedAnswerInput {
                    question_id: "q-essay".to_string(),
                    answer: "Zakat requires nisab...".to_string(),
                    selected_option: None,
                    is_correct: Some(true),
                    marks_obtained: 9,
                }],
                total_marks_obtained: 14,
                feedback: Some("Well done".to_string()),
                graded_by: ObjectId::new().to_hex(),
            },
        )
        .await
        .unwrap();

    assert_eq!(graded.status, SubmissionStatus::Graded);
    assert_eq!(graded.total_marks_obtained, 14);
    assert!(graded.graded_at.is_some());
}

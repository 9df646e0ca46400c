use std::sync::Arc;

use crate::{
    db::Database,
    errors::AppResult,
    repositories::{
        AssignmentRepository, AttendanceRepository, ClassRepository, ExamScheduleRepository,
        LeaveRepository, LessonPlanRepository, MessageRepository, MongoAssignmentRepository,
        MongoAttendanceRepository, MongoClassRepository, MongoExamScheduleRepository,
        MongoLeaveRepository, MongoLessonPlanRepository, MongoMessageRepository,
        MongoNewsletterRepository, MongoQuizAttemptRepository, MongoQuizRepository,
        MongoResultRepository, MongoSessionRepository, MongoStudentRepository,
        MongoSubmissionRepository, NewsletterRepository, QuizAttemptRepository, QuizRepository,
        ResultRepository, SessionRepository, StudentRepository, SubmissionRepository,
    },
    services::{
        AssignmentService, AttendanceService, ClassService, EnrollmentService,
        ExamScheduleService, LeaveService, LessonPlanService, MessageService, NewsletterService,
        QuizAttemptService, QuizService, ResultService, SessionService, StudentService,
        SubmissionService,
    },
};

/// Shared application state handed to every handler.
pub struct AppState {
    pub database: Database,
    pub class_service: ClassService,
    pub session_service: SessionService,
    pub student_service: StudentService,
    pub enrollment_service: EnrollmentService,
    pub quiz_service: QuizService,
    pub quiz_attempt_service: QuizAttemptService,
    pub assignment_service: AssignmentService,
    pub submission_service: SubmissionService,
    pub attendance_service: AttendanceService,
    pub result_service: ResultService,
    pub exam_schedule_service: ExamScheduleService,
    pub lesson_plan_service: LessonPlanService,
    pub leave_service: LeaveService,
    pub message_service: MessageService,
    pub newsletter_service: NewsletterService,
}

impl AppState {
    pub async fn new(database: Database) -> AppResult<Self> {
        let students = Arc::new(MongoStudentRepository::new(&database));
        let classes = Arc::new(MongoClassRepository::new(&database));
        let sessions = Arc::new(MongoSessionRepository::new(&database));
        let quizzes = Arc::new(MongoQuizRepository::new(&database));
        let attempts = Arc::new(MongoQuizAttemptRepository::new(&database));
        let assignments = Arc::new(MongoAssignmentRepository::new(&database));
        let submissions = Arc::new(MongoSubmissionRepository::new(&database));
        let attendance = Arc::new(MongoAttendanceRepository::new(&database));
        let results = Arc::new(MongoResultRepository::new(&database));
        let exams = Arc::new(MongoExamScheduleRepository::new(&database));
        let lesson_plans = Arc::new(MongoLessonPlanRepository::new(&database));
        let leaves = Arc::new(MongoLeaveRepository::new(&database));
        let messages = Arc::new(MongoMessageRepository::new(&database));
        let newsletter = Arc::new(MongoNewsletterRepository::new(&database));

        students.ensure_indexes().await?;
        classes.ensure_indexes().await?;
        sessions.ensure_indexes().await?;
        quizzes.ensure_indexes().await?;
        attempts.ensure_indexes().await?;
        assignments.ensure_indexes().await?;
        submissions.ensure_indexes().await?;
        attendance.ensure_indexes().await?;
        results.ensure_indexes().await?;
        exams.ensure_indexes().await?;
        lesson_plans.ensure_indexes().await?;
        leaves.ensure_indexes().await?;
        messages.ensure_indexes().await?;
        newsletter.ensure_indexes().await?;

        Ok(Self {
            class_service: ClassService::new(classes.clone()),
            session_service: SessionService::new(sessions.clone()),
            student_service: StudentService::new(students.clone()),
            enrollment_service: EnrollmentService::new(
                students.clone(),
                classes.clone(),
                sessions.clone(),
            ),
            quiz_service: QuizService::new(quizzes.clone(), classes.clone()),
            quiz_attempt_service: QuizAttemptService::new(
                attempts.clone(),
                quizzes.clone(),
                students.clone(),
            ),
            assignment_service: AssignmentService::new(
                assignments.clone(),
                classes.clone(),
                students.clone(),
                submissions.clone(),
            ),
            submission_service: SubmissionService::new(
                submissions.clone(),
                assignments.clone(),
                students.clone(),
            ),
            attendance_service: AttendanceService::new(
                attendance.clone(),
                classes.clone(),
                students.clone(),
            ),
            result_service: ResultService::new(results.clone(), students.clone(), exams.clone()),
            exam_schedule_service: ExamScheduleService::new(exams.clone(), classes.clone()),
            lesson_plan_service: LessonPlanService::new(lesson_plans.clone(), classes.clone()),
            leave_service: LeaveService::new(leaves.clone(), students.clone()),
            message_service: MessageService::new(messages.clone(), students.clone()),
            newsletter_service: NewsletterService::new(newsletter.clone()),
            database,
        })
    }
}

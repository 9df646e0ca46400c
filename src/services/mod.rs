pub mod assignment_service;
pub mod attendance_service;
pub mod class_service;
pub mod enrollment;
pub mod exam_schedule_service;
pub mod grading;
pub mod leave_service;
pub mod lesson_plan_service;
pub mod message_service;
pub mod newsletter_service;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod result_service;
pub mod session_service;
pub mod student_service;
pub mod submission_service;

pub use assignment_service::AssignmentService;
pub use attendance_service::AttendanceService;
pub use class_service::ClassService;
pub use enrollment::EnrollmentService;
pub use exam_schedule_service::ExamScheduleService;
pub use leave_service::LeaveService;
pub use lesson_plan_service::LessonPlanService;
pub use message_service::MessageService;
pub use newsletter_service::NewsletterService;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_service::QuizService;
pub use result_service::ResultService;
pub use session_service::SessionService;
pub use student_service::StudentService;
pub use submission_service::SubmissionService;

pub mod assignment_repository;
pub mod attendance_repository;
pub mod class_repository;
pub mod exam_schedule_repository;
pub mod leave_repository;
pub mod lesson_plan_repository;
pub mod message_repository;
pub mod newsletter_repository;
pub mod quiz_attempt_repository;
pub mod quiz_repository;
pub mod result_repository;
pub mod session_repository;
pub mod student_repository;
pub mod submission_repository;

pub use assignment_repository::{AssignmentRepository, MongoAssignmentRepository};
pub use attendance_repository::{AttendanceRepository, MongoAttendanceRepository};
pub use class_repository::{ClassRepository, MongoClassRepository};
pub use exam_schedule_repository::{ExamScheduleRepository, MongoExamScheduleRepository};
pub use leave_repository::{LeaveRepository, MongoLeaveRepository};
pub use lesson_plan_repository::{LessonPlanRepository, MongoLessonPlanRepository};
pub use message_repository::{MessageRepository, MongoMessageRepository};
pub use newsletter_repository::{MongoNewsletterRepository, NewsletterRepository};
pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use result_repository::{MongoResultRepository, ResultRepository};
pub use session_repository::{MongoSessionRepository, SessionRepository};
pub use student_repository::{MongoStudentRepository, StudentRepository};
pub use submission_repository::{MongoSubmissionRepository, SubmissionRepository};

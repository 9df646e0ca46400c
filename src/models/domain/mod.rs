pub mod assignment;
pub mod attendance;
pub mod class;
pub mod exam_schedule;
pub mod leave;
pub mod lesson_plan;
pub mod message;
pub mod newsletter;
pub mod question;
pub mod quiz;
pub mod quiz_attempt;
pub mod result;
pub mod session;
pub mod student;
pub mod submission;

pub use assignment::{Assignment, AssignmentStatus, Attachment};
pub use attendance::{AttendanceRecord, AttendanceSheet, AttendanceStatus};
pub use class::Class;
pub use exam_schedule::{ExamSchedule, ExamStatus};
pub use leave::{LeaveRequest, LeaveStatus};
pub use lesson_plan::{LessonPlan, LessonPlanStatus};
pub use message::{Message, MessageRecipients, MessageStatus};
pub use newsletter::{NewsletterSubscriber, SubscriberPreferences};
pub use question::{Answer, Question, QuestionOption, QuestionType};
pub use quiz::{Quiz, QuizStatus};
pub use quiz_attempt::{AttemptStatus, QuizAttempt};
pub use result::ExamResult;
pub use session::Session;
pub use student::{
    ApplicationStatus, ClassHistoryEntry, ClassProgressStatus, GuardianInfo, PersonalInfo, Student,
    StudentStatus,
};
pub use submission::{AssignmentSubmission, SubmissionStatus};

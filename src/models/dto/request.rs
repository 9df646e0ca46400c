use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::assignment::{Attachment, AssignmentStatus};
use crate::models::domain::exam_schedule::ExamStatus;
use crate::models::domain::leave::LeaveStatus;
use crate::models::domain::lesson_plan::LessonPlanStatus;
use crate::models::domain::newsletter::SubscriberPreferences;
use crate::models::domain::question::{Answer, Question, QuestionOption, QuestionType};
use crate::models::domain::quiz::QuizStatus;
use crate::models::domain::student::{ApplicationStatus, ClassProgressStatus, StudentStatus};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1, max = 100))]
    pub class_name: String,
    pub teacher_assigned: Option<String>,
    pub class_timing: Option<String>,
    pub class_day: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClassRequest {
    #[validate(length(min = 1, max = 100))]
    pub class_name: Option<String>,
    pub teacher_assigned: Option<String>,
    pub class_timing: Option<String>,
    pub class_day: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 1, max = 100))]
    pub session_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuestionInput {
    #[validate(length(min = 1))]
    pub question_text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOptionInput>,
    pub correct_answer: Option<String>,
    #[validate(range(min = 1))]
    pub marks: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionOptionInput {
    pub option_text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl From<QuestionInput> for Question {
    fn from(input: QuestionInput) -> Self {
        Question::new(
            &input.question_text,
            input.question_type,
            input
                .options
                .into_iter()
                .map(|o| QuestionOption::new(&o.option_text, o.is_correct))
                .collect(),
            input.correct_answer,
            input.marks,
        )
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub class_id: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub quiz_date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    #[validate(range(min = 5))]
    pub duration: i32,
    pub passing_marks: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<QuestionInput>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub quiz_date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[validate(range(min = 5))]
    pub duration: Option<i32>,
    pub passing_marks: Option<i32>,
    #[validate(nested)]
    pub questions: Option<Vec<QuestionInput>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub class_id: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub due_date: DateTime<Utc>,
    pub end_time: String,
    /// Defaults to the ISO week of the due date.
    pub week_number: Option<i32>,
    pub year: Option<i32>,
    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<QuestionInput>,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAssignmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub end_time: Option<String>,
    pub week_number: Option<i32>,
    pub year: Option<i32>,
    #[validate(nested)]
    pub questions: Option<Vec<QuestionInput>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentInput {
    pub filename: String,
    pub url: String,
}

impl From<AttachmentInput> for Attachment {
    fn from(input: AttachmentInput) -> Self {
        Attachment {
            filename: input.filename,
            url: input.url,
            uploaded_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerInput {
    pub question_id: String,
    #[serde(default)]
    pub answer: String,
    pub selected_option: Option<String>,
}

impl From<AnswerInput> for Answer {
    fn from(input: AnswerInput) -> Self {
        Answer {
            question_id: input.question_id,
            answer: input.answer,
            selected_option: input.selected_option,
            is_correct: None,
            marks_obtained: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartQuizAttemptRequest {
    pub quiz_id: String,
    pub student_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitQuizAttemptRequest {
    pub quiz_id: String,
    pub student_id: String,
    pub answers: Vec<AnswerInput>,
    pub time_taken: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAssignmentRequest {
    pub assignment_id: String,
    pub student_id: String,
    pub answers: Vec<AnswerInput>,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
}

/// Manual grading for short-answer/essay work; overwrites the stored
/// answers and total wholesale.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ManualGradeRequest {
    pub answers: Vec<GradedAnswerInput>,
    pub total_marks_obtained: i32,
    pub feedback: Option<String>,
    pub graded_by: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradedAnswerInput {
    pub question_id: String,
    #[serde(default)]
    pub answer: String,
    pub selected_option: Option<String>,
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub marks_obtained: i32,
}

impl From<GradedAnswerInput> for Answer {
    fn from(input: GradedAnswerInput) -> Self {
        Answer {
            question_id: input.question_id,
            answer: input.answer,
            selected_option: input.selected_option,
            is_correct: input.is_correct,
            marks_obtained: input.marks_obtained,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PromoteStudentsRequest {
    #[validate(length(min = 1))]
    pub student_ids: Vec<String>,
    #[validate(length(min = 1))]
    pub from_class: String,
    #[validate(length(min = 1))]
    pub to_class: String,
    #[validate(length(min = 1))]
    pub year: String,
    #[validate(length(min = 1))]
    pub session: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateClassStatusRequest {
    #[validate(length(min = 1))]
    pub class_name: String,
    /// Disambiguates repeated enrollments in the same class; first match by
    /// array order when absent.
    pub entry_id: Option<String>,
    pub status: ClassProgressStatus,
    pub result: Option<String>,
    pub repeat_count: Option<i32>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddClassHistoryRequest {
    #[validate(length(min = 1))]
    pub class_name: String,
    #[validate(length(min = 1))]
    pub year: String,
    #[validate(length(min = 1))]
    pub session: String,
    pub status: ClassProgressStatus,
    pub result: Option<String>,
    pub repeat_count: Option<i32>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub father_name: Option<String>,
    pub gender: Option<String>,
    pub whatsapp_no: Option<String>,
    pub dob: Option<String>,
    #[validate(range(min = 9, max = 19, message = "Age is not according to our school"))]
    pub age: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MarkAttendanceRequest {
    pub class_id: String,
    pub date: DateTime<Utc>,
    #[validate(length(min = 1, message = "No attendance records provided"))]
    pub attendance: Vec<AttendanceEntryInput>,
    pub marked_by: String,
}

// Serialize: the length validator reports the offending value as a param.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttendanceEntryInput {
    pub student_id: String,
    pub status: crate::models::domain::attendance::AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddResultRequest {
    pub student_id: String,
    pub exam_id: String,
    #[validate(length(min = 1))]
    pub exam_name: String,
    pub class_id: String,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(range(min = 0))]
    pub marks_obtained: i32,
    #[validate(range(min = 1))]
    pub total_marks: i32,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateResultRequest {
    #[validate(range(min = 0))]
    pub marks_obtained: Option<i32>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishResultsRequest {
    pub exam_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateExamScheduleRequest {
    #[validate(length(min = 1, max = 200))]
    pub exam_name: String,
    pub class_id: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub exam_date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    #[validate(range(min = 1))]
    pub duration: i32,
    pub total_marks: Option<i32>,
    pub passing_marks: Option<i32>,
    pub exam_type: Option<String>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateExamScheduleRequest {
    #[validate(length(min = 1, max = 200))]
    pub exam_name: Option<String>,
    pub class_id: Option<String>,
    pub subject: Option<String>,
    pub exam_date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration: Option<i32>,
    pub total_marks: Option<i32>,
    pub passing_marks: Option<i32>,
    pub exam_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLessonPlanRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub class_id: String,
    #[validate(length(min = 1, max = 100))]
    pub subject: String,
    pub week_number: i32,
    pub year: i32,
    pub content: Option<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLessonPlanRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub week_number: Option<i32>,
    pub year: Option<i32>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplyLeaveRequest {
    pub user_id: String,
    #[validate(length(min = 1, max = 50))]
    pub leave_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLeaveStatusRequest {
    pub status: LeaveStatus,
    pub admin_comments: Option<String>,
    pub approved_by: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub message: String,
    #[serde(default)]
    pub all: bool,
    #[serde(default)]
    pub class_ids: Vec<String>,
    #[serde(default)]
    pub session_ids: Vec<String>,
    #[serde(default)]
    pub custom_emails: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_by: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub preferences: SubscriberPreferences,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UnsubscribeRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivateRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyStudentRequest {
    pub verified: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApplicationStatusRequest {
    pub application_status: ApplicationStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStudentStatusRequest {
    pub status: StudentStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuizStatusRequest {
    pub status: QuizStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAssignmentStatusRequest {
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExamStatusRequest {
    pub status: ExamStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLessonPlanStatusRequest {
    pub status: LessonPlanStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_subscribe_request() {
        let request = SubscribeRequest {
            email: "parent@example.com".to_string(),
            source: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_invalid_email_rejected() {
        let request = SubscribeRequest {
            email: "not-an-email".to_string(),
            source: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_promotion_batch_rejected() {
        let request = PromoteStudentsRequest {
            student_ids: vec![],
            from_class: "Awwal".to_string(),
            to_class: "Doam".to_string(),
            year: "2025".to_string(),
            session: "2025-2026".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_empty_attendance_sheet_rejected() {
        use chrono::Utc;

        let request = MarkAttendanceRequest {
            class_id: "abc".to_string(),
            date: Utc::now(),
            attendance: vec![],
            marked_by: "admin".to_string(),
        };
        assert!(request.validate().is_err());

        let request = MarkAttendanceRequest {
            attendance: vec![AttendanceEntryInput {
                student_id: "abc".to_string(),
                status: crate::models::domain::attendance::AttendanceStatus::Present,
            }],
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_profile_age_bounds() {
        let request = UpdateProfileRequest {
            first_name: None,
            last_name: None,
            father_name: None,
            gender: None,
            whatsapp_no: None,
            dob: None,
            age: Some(25),
            address: None,
            city: None,
            country: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_question_input_converts_with_fresh_ids() {
        let input = QuestionInput {
            question_text: "Is fasting obligatory in Ramadan?".to_string(),
            question_type: QuestionType::TrueFalse,
            options: vec![],
            correct_answer: Some("true".to_string()),
            marks: 5,
        };

        let question: Question = input.into();
        assert!(!question.id.is_empty());
        assert_eq!(question.marks, 5);
        assert_eq!(question.question_type, QuestionType::TrueFalse);
    }
}

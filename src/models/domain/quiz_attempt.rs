use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::domain::question::Answer;

/// A student's attempt at a quiz. At most one active attempt per
/// (student, quiz) pair.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub quiz_id: ObjectId,
    pub student_id: ObjectId,
    pub student_name: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub status: AttemptStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_marks_obtained: i32,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub passed: bool,
    /// Minutes spent, as reported by the client.
    #[serde(default)]
    pub time_taken: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graded_by: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graded_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    #[default]
    InProgress,
    Submitted,
    Graded,
}

impl QuizAttempt {
    pub fn new(quiz_id: ObjectId, student_id: ObjectId, student_name: &str) -> Self {
        QuizAttempt {
            id: Some(ObjectId::new()),
            quiz_id,
            student_id,
            student_name: student_name.to_string(),
            answers: vec![],
            status: AttemptStatus::InProgress,
            started_at: Utc::now(),
            submitted_at: None,
            total_marks_obtained: 0,
            percentage: 0.0,
            passed: false,
            time_taken: 0,
            feedback: None,
            graded_by: None,
            graded_at: None,
            is_active: true,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_attempt_starts_in_progress_with_zero_score() {
        let attempt = QuizAttempt::new(ObjectId::new(), ObjectId::new(), "Ali Raza");
        assert_eq!(attempt.status, AttemptStatus::InProgress);
        assert_eq!(attempt.total_marks_obtained, 0);
        assert!(!attempt.passed);
        assert!(attempt.submitted_at.is_none());
    }

    #[test]
    fn attempt_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&AttemptStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}

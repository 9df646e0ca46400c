use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::domain::assignment::Attachment;
use crate::models::domain::question::Answer;

/// A student's submission against an assignment. At most one active
/// submission per (student, assignment) pair.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AssignmentSubmission {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub assignment_id: ObjectId,
    pub student_id: ObjectId,
    pub student_name: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub total_marks_obtained: i32,
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

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
    Late,
    Graded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::Late).unwrap(),
            "\"late\""
        );
        let parsed: SubmissionStatus = serde_json::from_str("\"graded\"").unwrap();
        assert_eq!(parsed, SubmissionStatus::Graded);
    }
}

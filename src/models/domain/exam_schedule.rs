use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExamSchedule {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub exam_name: String,
    pub class_id: ObjectId,
    pub class_name: String,
    pub subject: String,
    pub exam_date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    /// Duration in minutes.
    pub duration: i32,
    #[serde(default = "default_total_marks")]
    pub total_marks: i32,
    #[serde(default = "default_passing_marks")]
    pub passing_marks: i32,
    #[serde(default = "default_exam_type")]
    pub exam_type: String,
    #[serde(default)]
    pub status: ExamStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

fn default_total_marks() -> i32 {
    100
}

fn default_passing_marks() -> i32 {
    40
}

fn default_exam_type() -> String {
    "final".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

use chrono::{DateTime, NaiveTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::domain::question::Question;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Assignment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub class_id: ObjectId,
    pub class_name: String,
    pub subject: String,
    pub due_date: DateTime<Utc>,
    /// "HH:MM" cutoff on the due date.
    pub end_time: String,
    #[serde(default)]
    pub total_marks: i32,
    #[serde(default)]
    pub status: AssignmentStatus,
    pub week_number: i32,
    pub year: i32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
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
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Draft,
    Published,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn recompute_total_marks(&mut self) {
        self.total_marks = self.questions.iter().map(|q| q.marks).sum();
    }

    /// Submission deadline: `end_time` on the due date. Falls back to end of
    /// day when the stored time string is malformed.
    pub fn deadline(&self) -> DateTime<Utc> {
        let time = NaiveTime::parse_from_str(&self.end_time, "%H:%M")
            .unwrap_or_else(|_| NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        self.due_date.date_naive().and_time(time).and_utc()
    }

    pub fn is_late(&self, submitted_at: DateTime<Utc>) -> bool {
        submitted_at > self.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_assignment(end_time: &str) -> Assignment {
        Assignment {
            id: Some(ObjectId::new()),
            title: "Surah memorization".to_string(),
            description: "Memorize and answer".to_string(),
            class_id: ObjectId::new(),
            class_name: "Doam".to_string(),
            subject: "Quran".to_string(),
            due_date: Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap(),
            end_time: end_time.to_string(),
            total_marks: 0,
            status: AssignmentStatus::Published,
            week_number: 14,
            year: 2025,
            questions: vec![],
            attachments: vec![],
            created_by: None,
            is_active: true,
            created_at: None,
            modified_at: None,
        }
    }

    #[test]
    fn lateness_compares_against_end_time_on_due_date() {
        let assignment = make_assignment("17:00");
        let on_time = Utc.with_ymd_and_hms(2025, 4, 2, 16, 59, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 4, 2, 17, 1, 0).unwrap();
        assert!(!assignment.is_late(on_time));
        assert!(assignment.is_late(late));
    }

    #[test]
    fn malformed_end_time_falls_back_to_end_of_day() {
        let assignment = make_assignment("bogus");
        let evening = Utc.with_ymd_and_hms(2025, 4, 2, 22, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2025, 4, 3, 0, 1, 0).unwrap();
        assert!(!assignment.is_late(evening));
        assert!(assignment.is_late(next_day));
    }
}

use chrono::{DateTime, NaiveTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::domain::question::Question;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub class_id: ObjectId,
    pub class_name: String,
    pub subject: String,
    pub quiz_date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    /// Duration in minutes.
    pub duration: i32,
    #[serde(default)]
    pub total_marks: i32,
    #[serde(default = "default_passing_marks")]
    pub passing_marks: i32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub status: QuizStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ObjectId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

fn default_passing_marks() -> i32 {
    40
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    #[default]
    Draft,
    Published,
    Ongoing,
    Completed,
}

impl Quiz {
    /// Total marks are always the sum of question marks, recomputed before
    /// every save rather than trusted from input.
    pub fn recompute_total_marks(&mut self) {
        self.total_marks = self.questions.iter().map(|q| q.marks).sum();
    }

    /// The quiz closes at `end_time` on `quiz_date`.
    pub fn closes_at(&self) -> Option<DateTime<Utc>> {
        let time = NaiveTime::parse_from_str(&self.end_time, "%H:%M").ok()?;
        Some(
            self.quiz_date
                .date_naive()
                .and_time(time)
                .and_utc(),
        )
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.status == QuizStatus::Completed {
            return true;
        }
        match self.closes_at() {
            Some(deadline) => now > deadline,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::question::{QuestionOption, QuestionType};
    use chrono::TimeZone;

    fn make_quiz() -> Quiz {
        Quiz {
            id: Some(ObjectId::new()),
            title: "Fiqh basics".to_string(),
            description: "Weekly quiz".to_string(),
            class_id: ObjectId::new(),
            class_name: "Awwal".to_string(),
            subject: "Fiqh".to_string(),
            quiz_date: Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
            start_time: "10:00".to_string(),
            end_time: "10:30".to_string(),
            duration: 30,
            total_marks: 0,
            passing_marks: 40,
            questions: vec![
                Question::new(
                    "Wudu is required before salah",
                    QuestionType::TrueFalse,
                    vec![],
                    Some("true".to_string()),
                    5,
                ),
                Question::new(
                    "How many rakat in Fajr?",
                    QuestionType::MultipleChoice,
                    vec![
                        QuestionOption::new("Two", true),
                        QuestionOption::new("Four", false),
                    ],
                    None,
                    5,
                ),
            ],
            status: QuizStatus::Draft,
            created_by: None,
            is_active: true,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    #[test]
    fn recompute_total_marks_sums_questions() {
        let mut quiz = make_quiz();
        quiz.recompute_total_marks();
        assert_eq!(quiz.total_marks, 10);
    }

    #[test]
    fn expiry_is_based_on_end_time_of_day() {
        let quiz = make_quiz();
        let before = Utc.with_ymd_and_hms(2025, 3, 10, 10, 29, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2025, 3, 10, 10, 31, 0).unwrap();
        assert!(!quiz.is_expired(before));
        assert!(quiz.is_expired(after));
    }

    #[test]
    fn completed_quiz_is_always_expired() {
        let mut quiz = make_quiz();
        quiz.status = QuizStatus::Completed;
        let early = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        assert!(quiz.is_expired(early));
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question embedded in an assignment or quiz. Immutable once students
/// have submitted against it.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    pub marks: i32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuestionOption {
    pub id: String,
    pub option_text: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

impl Question {
    pub fn new(
        question_text: &str,
        question_type: QuestionType,
        options: Vec<QuestionOption>,
        correct_answer: Option<String>,
        marks: i32,
    ) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            question_text: question_text.to_string(),
            question_type,
            options,
            correct_answer,
            marks,
        }
    }
}

impl QuestionOption {
    pub fn new(option_text: &str, is_correct: bool) -> Self {
        QuestionOption {
            id: Uuid::new_v4().to_string(),
            option_text: option_text.to_string(),
            is_correct,
        }
    }
}

/// One submitted answer, graded in place by the grading engine or by a
/// human grader.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Answer {
    pub question_id: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub marks_obtained: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_serializes_to_snake_case() {
        let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple_choice\"");

        let parsed: QuestionType = serde_json::from_str("\"true_false\"").unwrap();
        assert_eq!(parsed, QuestionType::TrueFalse);
    }

    #[test]
    fn question_type_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<QuestionType>("\"matching\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn answer_defaults_marks_to_zero() {
        let parsed: Answer =
            serde_json::from_str(r#"{"question_id":"q-1","answer":"true"}"#).unwrap();
        assert_eq!(parsed.marks_obtained, 0);
        assert!(parsed.is_correct.is_none());
    }
}

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One result per (student, exam); duplicates are rejected. Percentage and
/// grade are recomputed from marks on every save.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ExamResult {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub student_name: String,
    pub exam_id: ObjectId,
    pub exam_name: String,
    pub class_id: ObjectId,
    pub subject: String,
    pub marks_obtained: i32,
    pub total_marks: i32,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default)]
    pub is_published: bool,
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

impl ExamResult {
    pub fn recompute(&mut self) {
        if self.total_marks > 0 {
            self.percentage = f64::from(self.marks_obtained) / f64::from(self.total_marks) * 100.0;
        } else {
            self.percentage = 0.0;
        }
        self.grade = grade_for(self.percentage).to_string();
    }
}

pub fn grade_for(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A+"
    } else if percentage >= 80.0 {
        "A"
    } else if percentage >= 70.0 {
        "B"
    } else if percentage >= 60.0 {
        "C"
    } else if percentage >= 50.0 {
        "D"
    } else {
        "F"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_bands() {
        assert_eq!(grade_for(95.0), "A+");
        assert_eq!(grade_for(90.0), "A+");
        assert_eq!(grade_for(85.0), "A");
        assert_eq!(grade_for(72.5), "B");
        assert_eq!(grade_for(60.0), "C");
        assert_eq!(grade_for(50.0), "D");
        assert_eq!(grade_for(49.9), "F");
    }

    #[test]
    fn recompute_sets_percentage_and_grade() {
        let mut result = ExamResult {
            id: None,
            student_id: ObjectId::new(),
            student_name: "Ali Raza".to_string(),
            exam_id: ObjectId::new(),
            exam_name: "Final".to_string(),
            class_id: ObjectId::new(),
            subject: "Fiqh".to_string(),
            marks_obtained: 45,
            total_marks: 50,
            percentage: 0.0,
            grade: String::new(),
            remarks: None,
            is_published: false,
            is_active: true,
            created_at: None,
            modified_at: None,
        };

        result.recompute();

        assert_eq!(result.percentage, 90.0);
        assert_eq!(result.grade, "A+");
    }

    #[test]
    fn recompute_with_zero_total_is_safe() {
        let mut result = ExamResult {
            id: None,
            student_id: ObjectId::new(),
            student_name: "Ali Raza".to_string(),
            exam_id: ObjectId::new(),
            exam_name: "Final".to_string(),
            class_id: ObjectId::new(),
            subject: "Fiqh".to_string(),
            marks_obtained: 0,
            total_marks: 0,
            percentage: 50.0,
            grade: String::new(),
            remarks: None,
            is_published: false,
            is_active: true,
            created_at: None,
            modified_at: None,
        };

        result.recompute();

        assert_eq!(result.percentage, 0.0);
        assert_eq!(result.grade, "F");
    }
}

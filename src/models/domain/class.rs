use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A class in the madrassa. `students_enrolled` is a denormalized counter
/// maintained by recount, never incrementally.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Class {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_assigned: Option<String>,
    #[serde(default)]
    pub students_passed: i64,
    #[serde(default)]
    pub students_enrolled: i64,
    #[serde(default)]
    pub class_timing: String,
    #[serde(default)]
    pub class_day: String,
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

impl Class {
    pub fn new(
        class_name: &str,
        teacher_assigned: Option<String>,
        class_timing: Option<String>,
        class_day: Option<String>,
    ) -> Self {
        Class {
            id: Some(ObjectId::new()),
            class_name: class_name.to_string(),
            teacher_assigned,
            students_passed: 0,
            students_enrolled: 0,
            class_timing: class_timing.unwrap_or_default(),
            class_day: class_day.unwrap_or_default(),
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
    fn new_class_starts_active_with_zero_counters() {
        let class = Class::new("Awwal", Some("Ustad Kazim".to_string()), None, None);
        assert!(class.is_active);
        assert_eq!(class.students_enrolled, 0);
        assert_eq!(class.students_passed, 0);
        assert_eq!(class.class_timing, "");
    }

    #[test]
    fn deserializes_with_defaults_for_missing_fields() {
        let class: Class = serde_json::from_str(r#"{"class_name":"Doam"}"#).unwrap();
        assert!(class.is_active);
        assert_eq!(class.students_enrolled, 0);
    }
}

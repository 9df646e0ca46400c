use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An enrolled (or applying) student. `class_history` is an ordered,
/// append-only list; entries are mutated in place but never removed.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Student {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub personal_info: PersonalInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_info: Option<GuardianInfo>,
    #[serde(default)]
    pub class_history: Vec<ClassHistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled_year: Option<String>,
    #[serde(default)]
    pub roll_no: i64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    /// Denormalized mirror of the current in-progress class history entry.
    #[serde(default)]
    pub enrolled_class: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GuardianInfo {
    pub name: String,
    pub relationship: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// One record of a student's enrollment in a class for a given year and
/// session. `entry_id` disambiguates repeated enrollments in the same class.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ClassHistoryEntry {
    pub entry_id: String,
    pub class_id: ObjectId,
    pub year: String,
    pub session_id: ObjectId,
    pub status: ClassProgressStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default)]
    pub repeat_count: i32,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ClassProgressStatus {
    #[serde(rename = "inprogress")]
    InProgress,
    Pass,
    Fail,
    Left,
}

impl ClassHistoryEntry {
    pub fn new_in_progress(class_id: ObjectId, year: &str, session_id: ObjectId) -> Self {
        ClassHistoryEntry {
            entry_id: Uuid::new_v4().to_string(),
            class_id,
            year: year.to_string(),
            session_id,
            status: ClassProgressStatus::InProgress,
            result: None,
            repeat_count: 0,
            is_completed: false,
        }
    }
}

impl Student {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.personal_info.first_name, self.personal_info.last_name
        )
    }

    /// A student counts towards enrollment numbers only once fully admitted.
    pub fn is_enrollable(&self) -> bool {
        self.personal_info.verified
            && self.personal_info.status == StudentStatus::Active
            && self.personal_info.application_status == ApplicationStatus::Accepted
    }
}

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One attendance sheet per (class, date); enforced by a unique compound
/// index. Totals are recomputed from the records on every write.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttendanceSheet {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub class_id: ObjectId,
    pub class_name: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub attendance_records: Vec<AttendanceRecord>,
    pub marked_by: ObjectId,
    #[serde(default)]
    pub total_students: i32,
    #[serde(default)]
    pub total_present: i32,
    #[serde(default)]
    pub total_absent: i32,
    #[serde(default)]
    pub total_late: i32,
    #[serde(default)]
    pub total_leave: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AttendanceRecord {
    pub student_id: ObjectId,
    pub student_name: String,
    #[serde(default)]
    pub roll_no: i64,
    pub status: AttendanceStatus,
    pub marked_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Leave,
}

impl AttendanceSheet {
    pub fn recompute_totals(&mut self) {
        self.total_students = self.attendance_records.len() as i32;
        self.total_present = self.count_status(AttendanceStatus::Present);
        self.total_absent = self.count_status(AttendanceStatus::Absent);
        self.total_late = self.count_status(AttendanceStatus::Late);
        self.total_leave = self.count_status(AttendanceStatus::Leave);
    }

    fn count_status(&self, status: AttendanceStatus) -> i32 {
        self.attendance_records
            .iter()
            .filter(|r| r.status == status)
            .count() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            student_id: ObjectId::new(),
            student_name: "Student".to_string(),
            roll_no: 1,
            status,
            marked_at: Utc::now(),
        }
    }

    #[test]
    fn totals_match_record_statuses() {
        let mut sheet = AttendanceSheet {
            id: None,
            class_id: ObjectId::new(),
            class_name: "Awwal".to_string(),
            date: Utc::now(),
            attendance_records: vec![
                record(AttendanceStatus::Present),
                record(AttendanceStatus::Present),
                record(AttendanceStatus::Absent),
                record(AttendanceStatus::Late),
                record(AttendanceStatus::Leave),
            ],
            marked_by: ObjectId::new(),
            total_students: 0,
            total_present: 0,
            total_absent: 0,
            total_late: 0,
            total_leave: 0,
            created_at: None,
            modified_at: None,
        };

        sheet.recompute_totals();

        assert_eq!(sheet.total_students, 5);
        assert_eq!(sheet.total_present, 2);
        assert_eq!(sheet.total_absent, 1);
        assert_eq!(sheet.total_late, 1);
        assert_eq!(sheet.total_leave, 1);
    }
}

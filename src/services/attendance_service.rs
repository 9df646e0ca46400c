use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{AttendanceRecord, AttendanceSheet, AttendanceStatus},
    models::dto::request::MarkAttendanceRequest,
    models::dto::response::{AttendanceStatsResponse, StudentAttendanceDay},
    repositories::{AttendanceRepository, ClassRepository, StudentRepository},
};

pub struct AttendanceService {
    attendance: Arc<dyn AttendanceRepository>,
    classes: Arc<dyn ClassRepository>,
    students: Arc<dyn StudentRepository>,
}

impl AttendanceService {
    pub fn new(
        attendance: Arc<dyn AttendanceRepository>,
        classes: Arc<dyn ClassRepository>,
        students: Arc<dyn StudentRepository>,
    ) -> Self {
        Self {
            attendance,
            classes,
            students,
        }
    }

    /// Marks (or re-marks) attendance for a class on a date. Marking twice
    /// for the same day replaces the earlier sheet; the submitted timestamp
    /// is truncated to the calendar day so re-marks land on the same sheet.
    pub async fn mark(&self, request: MarkAttendanceRequest) -> AppResult<AttendanceSheet> {
        request.validate()?;

        let date = start_of_day(request.date);
        if date > Utc::now() {
            return Err(AppError::ValidationError(
                "Cannot mark attendance for a future date".to_string(),
            ));
        }

        let class_id = ObjectId::parse_str(&request.class_id)?;
        let class = self
            .classes
            .find_by_id(&class_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Class with id '{}' not found", request.class_id))
            })?;
        let marked_by = ObjectId::parse_str(&request.marked_by)?;

        let now = Utc::now();
        let mut records = Vec::with_capacity(request.attendance.len());
        for entry in request.attendance {
            let student_id = ObjectId::parse_str(&entry.student_id)?;
            let student = self
                .students
                .find_by_id(&student_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "Student with id '{}' not found",
                        entry.student_id
                    ))
                })?;

            records.push(AttendanceRecord {
                student_id,
                student_name: student.full_name(),
                roll_no: student.personal_info.roll_no,
                status: entry.status,
                marked_at: now,
            });
        }

        let existing = self
            .attendance
            .find_by_class_and_date(&class_id, date)
            .await?;

        let mut sheet = AttendanceSheet {
            id: existing.as_ref().and_then(|s| s.id).or_else(|| Some(ObjectId::new())),
            class_id,
            class_name: class.class_name,
            date,
            attendance_records: records,
            marked_by,
            total_students: 0,
            total_present: 0,
            total_absent: 0,
            total_late: 0,
            total_leave: 0,
            created_at: existing.and_then(|s| s.created_at).or(Some(now)),
            modified_at: Some(now),
        };
        sheet.recompute_totals();

        self.attendance.upsert(sheet).await
    }

    pub async fn for_class(
        &self,
        class_id: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<AttendanceSheet>> {
        let oid = ObjectId::parse_str(class_id)?;
        self.attendance.find_by_class(&oid, from, to).await
    }

    pub async fn for_class_on(
        &self,
        class_id: &str,
        date: DateTime<Utc>,
    ) -> AppResult<AttendanceSheet> {
        let oid = ObjectId::parse_str(class_id)?;
        self.attendance
            .find_by_class_and_date(&oid, start_of_day(date))
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No attendance marked for this class and date".to_string())
            })
    }

    /// A student's day-by-day history across every sheet they appear in.
    pub async fn for_student(&self, student_id: &str) -> AppResult<Vec<StudentAttendanceDay>> {
        let oid = ObjectId::parse_str(student_id)?;
        let sheets = self.attendance.find_for_student(&oid).await?;

        Ok(sheets
            .into_iter()
            .filter_map(|sheet| {
                let status = sheet
                    .attendance_records
                    .iter()
                    .find(|r| r.student_id == oid)
                    .map(|r| r.status)?;
                Some(StudentAttendanceDay {
                    date: sheet.date,
                    class_name: sheet.class_name,
                    status,
                })
            })
            .collect())
    }

    pub async fn stats_for_student(&self, student_id: &str) -> AppResult<AttendanceStatsResponse> {
        let days = self.for_student(student_id).await?;

        let count = |status: AttendanceStatus| {
            days.iter().filter(|d| d.status == status).count() as i32
        };

        let present = count(AttendanceStatus::Present);
        let late = count(AttendanceStatus::Late);
        let total = days.len();

        // Late still counts as attended for percentage purposes.
        let percentage = if total > 0 {
            let attended = f64::from(present + late);
            (attended / total as f64 * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        Ok(AttendanceStatsResponse {
            total_days: total,
            present,
            absent: count(AttendanceStatus::Absent),
            late,
            leave: count(AttendanceStatus::Leave),
            percentage,
        })
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.attendance.delete(&oid).await
    }
}

/// Sheets are keyed by (class, calendar day); submitted timestamps are
/// truncated to UTC midnight before any lookup or write.
fn start_of_day(date: DateTime<Utc>) -> DateTime<Utc> {
    date.date_naive().and_time(NaiveTime::MIN).and_utc()
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::attendance::AttendanceStatus;
use crate::models::domain::class::Class;

/// Standard envelope for single-object responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: &str, data: T) -> Self {
        ApiResponse {
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn message_only(message: &str) -> ApiResponse<T> {
        ApiResponse {
            message: message.to_string(),
            data: None,
        }
    }
}

/// Envelope for list endpoints, with the item count alongside the data.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub message: String,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(message: &str, data: Vec<T>) -> Self {
        ListResponse {
            message: message.to_string(),
            count: data.len(),
            data,
        }
    }
}

/// Outcome of a batch promotion. Failures are reported per student and do
/// not abort the rest of the batch.
#[derive(Debug, Clone, Serialize)]
pub struct PromotionOutcome {
    pub promoted: Vec<String>,
    pub failed: Vec<PromotionFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromotionFailure {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub roll_no: i64,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrolledStudentsResponse {
    pub class: Class,
    pub total_students: usize,
    pub students: Vec<StudentSummary>,
}

/// Per-class enrollment count after a reconciliation pass.
#[derive(Debug, Clone, Serialize)]
pub struct ClassCount {
    pub class_id: String,
    pub class_name: String,
    pub students_enrolled: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncCountsResponse {
    pub classes_updated: usize,
    pub counts: Vec<ClassCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceStatsResponse {
    pub total_days: usize,
    pub present: i32,
    pub absent: i32,
    pub late: i32,
    pub leave: i32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentAttendanceDay {
    pub date: DateTime<Utc>,
    pub class_name: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageStatsResponse {
    pub total: u64,
    pub draft: u64,
    pub scheduled: u64,
    pub sent: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsletterStatsResponse {
    pub total: u64,
    pub active: u64,
    pub verified: u64,
    pub unsubscribed: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_response_counts_items() {
        let response = ListResponse::new("ok", vec![1, 2, 3]);
        assert_eq!(response.count, 3);
    }

    #[test]
    fn api_response_omits_missing_data() {
        let response: ApiResponse<i32> = ApiResponse::message_only("deleted");
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("data"));
    }
}

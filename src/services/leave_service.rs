use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{LeaveRequest, LeaveStatus},
    models::dto::request::{ApplyLeaveRequest, UpdateLeaveStatusRequest},
    repositories::{LeaveRepository, StudentRepository},
};

pub struct LeaveService {
    leaves: Arc<dyn LeaveRepository>,
    students: Arc<dyn StudentRepository>,
}

impl LeaveService {
    pub fn new(leaves: Arc<dyn LeaveRepository>, students: Arc<dyn StudentRepository>) -> Self {
        Self { leaves, students }
    }

    pub async fn apply(&self, request: ApplyLeaveRequest) -> AppResult<LeaveRequest> {
        request.validate()?;

        if request.end_date < request.start_date {
            return Err(AppError::ValidationError(
                "Leave end date cannot be before its start date".to_string(),
            ));
        }

        let user_id = ObjectId::parse_str(&request.user_id)?;
        let user = self
            .students
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with id '{}' not found", request.user_id))
            })?;

        let leave = LeaveRequest {
            id: Some(ObjectId::new()),
            user_id,
            user_name: user.full_name(),
            leave_type: request.leave_type,
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason,
            status: LeaveStatus::Pending,
            admin_comments: None,
            approved_by: None,
            is_active: true,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        };

        self.leaves.create(leave).await
    }

    pub async fn get(&self, id: &str) -> AppResult<LeaveRequest> {
        let oid = ObjectId::parse_str(id)?;
        self.leaves
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Leave request with id '{}' not found", id)))
    }

    pub async fn list(&self, status: Option<LeaveStatus>) -> AppResult<Vec<LeaveRequest>> {
        self.leaves.find_all(status).await
    }

    pub async fn for_user(&self, user_id: &str) -> AppResult<Vec<LeaveRequest>> {
        let oid = ObjectId::parse_str(user_id)?;
        self.leaves.find_by_user(&oid).await
    }

    /// Approves or rejects a pending request. Decided requests are final.
    pub async fn decide(
        &self,
        id: &str,
        request: UpdateLeaveStatusRequest,
    ) -> AppResult<LeaveRequest> {
        request.validate()?;

        if request.status == LeaveStatus::Pending {
            return Err(AppError::ValidationError(
                "A decision must be either approved or rejected".to_string(),
            ));
        }

        let oid = ObjectId::parse_str(id)?;
        let mut leave = self
            .leaves
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Leave request with id '{}' not found", id))
            })?;

        if leave.status != LeaveStatus::Pending {
            return Err(AppError::ValidationError(format!(
                "Leave request has already been {:?}",
                leave.status
            )));
        }

        leave.status = request.status;
        leave.admin_comments = request.admin_comments;
        leave.approved_by = Some(ObjectId::parse_str(&request.approved_by)?);
        leave.modified_at = Some(Utc::now());

        log::info!("Leave request '{}' decided: {:?}", id, leave.status);

        self.leaves.update(&oid, leave).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.leaves.soft_delete(&oid).await
    }
}

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::Session,
    models::dto::request::CreateSessionRequest,
    repositories::SessionRepository,
};

pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
}

impl SessionService {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn create(&self, request: CreateSessionRequest) -> AppResult<Session> {
        request.validate()?;

        if self
            .sessions
            .find_by_name(&request.session_name)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "Session '{}' already exists",
                request.session_name
            )));
        }

        self.sessions.create(Session::new(&request.session_name)).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Session> {
        let oid = ObjectId::parse_str(id)?;
        self.sessions
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))
    }

    pub async fn list(&self) -> AppResult<Vec<Session>> {
        self.sessions.find_all().await
    }

    pub async fn active(&self) -> AppResult<Session> {
        self.sessions
            .find_active()
            .await?
            .ok_or_else(|| AppError::NotFound("No active session".to_string()))
    }

    /// Makes `id` the single active session.
    pub async fn activate(&self, id: &str) -> AppResult<Session> {
        let oid = ObjectId::parse_str(id)?;
        let session = self
            .sessions
            .find_by_id(&oid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))?;

        if session.is_active {
            return Err(AppError::ValidationError(format!(
                "Session '{}' is already active",
                session.session_name
            )));
        }

        self.sessions.deactivate_all().await?;
        self.sessions.set_active(&oid, true).await?;

        log::info!("Session '{}' is now active", session.session_name);
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = ObjectId::parse_str(id)?;
        self.sessions.delete(&oid).await
    }
}

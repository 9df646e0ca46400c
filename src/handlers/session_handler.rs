use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::CreateSessionRequest,
    models::dto::response::{ApiResponse, ListResponse},
};

#[post("/api/sessions")]
async fn create_session(
    state: web::Data<AppState>,
    request: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Session created", session)))
}

#[get("/api/sessions")]
async fn get_all_sessions(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let sessions = state.session_service.list().await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Sessions fetched", sessions)))
}

#[get("/api/sessions/active")]
async fn get_active_session(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = state.session_service.active().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Active session fetched", session)))
}

#[get("/api/sessions/{id}")]
async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Session fetched", session)))
}

#[patch("/api/sessions/{id}/activate")]
async fn activate_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.activate(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Session activated", session)))
}

#[delete("/api/sessions/{id}")]
async fn delete_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.session_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Session deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_session)
        .service(get_all_sessions)
        .service(get_active_session)
        .service(activate_session)
        .service(get_session)
        .service(delete_session);
}

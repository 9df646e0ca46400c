use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{
        CreateAssignmentRequest, UpdateAssignmentRequest, UpdateAssignmentStatusRequest,
    },
    models::dto::response::{ApiResponse, ListResponse},
};

#[derive(Debug, Deserialize)]
struct AssignmentListQuery {
    class_id: Option<String>,
    week_number: Option<i32>,
    year: Option<i32>,
}

#[post("/api/assignments")]
async fn create_assignment(
    state: web::Data<AppState>,
    request: web::Json<CreateAssignmentRequest>,
) -> Result<HttpResponse, AppError> {
    let assignment = state.assignment_service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Assignment created", assignment)))
}

#[get("/api/assignments")]
async fn get_all_assignments(
    state: web::Data<AppState>,
    query: web::Query<AssignmentListQuery>,
) -> Result<HttpResponse, AppError> {
    let assignments = state
        .assignment_service
        .list(query.class_id.as_deref(), query.week_number, query.year)
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Assignments fetched", assignments)))
}

#[get("/api/assignments/class/{class_id}/current-week")]
async fn get_current_week(
    state: web::Data<AppState>,
    class_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let assignments = state.assignment_service.current_week(&class_id).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new(
        "Current week assignments fetched",
        assignments,
    )))
}

#[get("/api/assignments/{id}")]
async fn get_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let assignment = state.assignment_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Assignment fetched", assignment)))
}

#[get("/api/assignments/{id}/missing-submissions")]
async fn get_missing_submissions(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let students = state.assignment_service.missing_submissions(&id).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Students without submissions", students)))
}

#[put("/api/assignments/{id}")]
async fn update_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateAssignmentRequest>,
) -> Result<HttpResponse, AppError> {
    let assignment = state
        .assignment_service
        .update(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Assignment updated", assignment)))
}

#[patch("/api/assignments/{id}/status")]
async fn update_assignment_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateAssignmentStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let assignment = state
        .assignment_service
        .set_status(&id, request.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Assignment status updated", assignment)))
}

#[delete("/api/assignments/{id}")]
async fn delete_assignment(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.assignment_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Assignment deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_assignment)
        .service(get_all_assignments)
        .service(get_current_week)
        .service(get_missing_submissions)
        .service(update_assignment_status)
        .service(get_assignment)
        .service(update_assignment)
        .service(delete_assignment);
}

use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::domain::ExamStatus,
    models::dto::request::{
        CreateExamScheduleRequest, UpdateExamScheduleRequest, UpdateExamStatusRequest,
    },
    models::dto::response::{ApiResponse, ListResponse},
};

#[derive(Debug, Deserialize)]
struct ExamListQuery {
    class_id: Option<String>,
    status: Option<ExamStatus>,
}

#[post("/api/exam-schedules")]
async fn create_exam_schedule(
    state: web::Data<AppState>,
    request: web::Json<CreateExamScheduleRequest>,
) -> Result<HttpResponse, AppError> {
    let schedule = state
        .exam_schedule_service
        .create(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Exam scheduled", schedule)))
}

#[get("/api/exam-schedules")]
async fn get_all_exam_schedules(
    state: web::Data<AppState>,
    query: web::Query<ExamListQuery>,
) -> Result<HttpResponse, AppError> {
    let schedules = state
        .exam_schedule_service
        .list(query.class_id.as_deref(), query.status)
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Exam schedules fetched", schedules)))
}

#[get("/api/exam-schedules/upcoming")]
async fn get_upcoming_exams(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let schedules = state.exam_schedule_service.upcoming().await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Upcoming exams fetched", schedules)))
}

#[get("/api/exam-schedules/{id}")]
async fn get_exam_schedule(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let schedule = state.exam_schedule_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Exam schedule fetched", schedule)))
}

#[put("/api/exam-schedules/{id}")]
async fn update_exam_schedule(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateExamScheduleRequest>,
) -> Result<HttpResponse, AppError> {
    let schedule = state
        .exam_schedule_service
        .update(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Exam schedule updated", schedule)))
}

#[patch("/api/exam-schedules/{id}/status")]
async fn update_exam_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateExamStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let schedule = state
        .exam_schedule_service
        .set_status(&id, request.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Exam status updated", schedule)))
}

#[delete("/api/exam-schedules/{id}")]
async fn delete_exam_schedule(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.exam_schedule_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Exam schedule deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_exam_schedule)
        .service(get_all_exam_schedules)
        .service(get_upcoming_exams)
        .service(update_exam_status)
        .service(get_exam_schedule)
        .service(update_exam_schedule)
        .service(delete_exam_schedule);
}

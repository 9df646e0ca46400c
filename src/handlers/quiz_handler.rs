use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::domain::QuizStatus,
    models::dto::request::{CreateQuizRequest, UpdateQuizRequest, UpdateQuizStatusRequest},
    models::dto::response::{ApiResponse, ListResponse},
};

#[derive(Debug, Deserialize)]
struct QuizListQuery {
    class_id: Option<String>,
    status: Option<QuizStatus>,
}

#[post("/api/quizzes")]
async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Quiz created", quiz)))
}

#[get("/api/quizzes")]
async fn get_all_quizzes(
    state: web::Data<AppState>,
    query: web::Query<QuizListQuery>,
) -> Result<HttpResponse, AppError> {
    let quizzes = state
        .quiz_service
        .list(query.class_id.as_deref(), query.status)
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Quizzes fetched", quizzes)))
}

#[get("/api/quizzes/class/{class_id}/open")]
async fn get_open_quizzes(
    state: web::Data<AppState>,
    class_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_open_for_class(&class_id).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Open quizzes fetched", quizzes)))
}

#[get("/api/quizzes/{id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Quiz fetched", quiz)))
}

#[put("/api/quizzes/{id}")]
async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.update(&id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Quiz updated", quiz)))
}

#[patch("/api/quizzes/{id}/status")]
async fn update_quiz_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.set_status(&id, request.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Quiz status updated", quiz)))
}

#[delete("/api/quizzes/{id}")]
async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Quiz deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_quiz)
        .service(get_all_quizzes)
        .service(get_open_quizzes)
        .service(update_quiz_status)
        .service(get_quiz)
        .service(update_quiz)
        .service(delete_quiz);
}

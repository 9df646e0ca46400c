use actix_web::{get, patch, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{
        ManualGradeRequest, StartQuizAttemptRequest, SubmitQuizAttemptRequest,
    },
    models::dto::response::{ApiResponse, ListResponse},
};

#[post("/api/quiz-attempts/start")]
async fn start_attempt(
    state: web::Data<AppState>,
    request: web::Json<StartQuizAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .quiz_attempt_service
        .start(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Attempt started", attempt)))
}

#[post("/api/quiz-attempts/submit")]
async fn submit_attempt(
    state: web::Data<AppState>,
    request: web::Json<SubmitQuizAttemptRequest>,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .quiz_attempt_service
        .submit(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Quiz submitted", attempt)))
}

#[get("/api/quiz-attempts/quiz/{quiz_id}")]
async fn get_attempts_by_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let attempts = state.quiz_attempt_service.list_by_quiz(&quiz_id).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Attempts fetched", attempts)))
}

#[get("/api/quiz-attempts/student/{student_id}")]
async fn get_attempts_by_student(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let attempts = state
        .quiz_attempt_service
        .list_by_student(&student_id)
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Attempts fetched", attempts)))
}

#[get("/api/quiz-attempts/{id}")]
async fn get_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let attempt = state.quiz_attempt_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Attempt fetched", attempt)))
}

#[patch("/api/quiz-attempts/{id}/grade")]
async fn grade_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<ManualGradeRequest>,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .quiz_attempt_service
        .grade(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Attempt graded", attempt)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(start_attempt)
        .service(submit_attempt)
        .service(get_attempts_by_quiz)
        .service(get_attempts_by_student)
        .service(grade_attempt)
        .service(get_attempt);
}

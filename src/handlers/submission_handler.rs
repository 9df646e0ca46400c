use actix_web::{get, patch, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{ManualGradeRequest, SubmitAssignmentRequest},
    models::dto::response::{ApiResponse, ListResponse},
};

#[post("/api/submissions")]
async fn submit_assignment(
    state: web::Data<AppState>,
    request: web::Json<SubmitAssignmentRequest>,
) -> Result<HttpResponse, AppError> {
    let submission = state.submission_service.submit(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Assignment submitted", submission)))
}

#[get("/api/submissions/assignment/{assignment_id}")]
async fn get_submissions_by_assignment(
    state: web::Data<AppState>,
    assignment_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let submissions = state
        .submission_service
        .list_by_assignment(&assignment_id)
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Submissions fetched", submissions)))
}

#[get("/api/submissions/student/{student_id}")]
async fn get_submissions_by_student(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let submissions = state
        .submission_service
        .list_by_student(&student_id)
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Submissions fetched", submissions)))
}

#[get("/api/submissions/{id}")]
async fn get_submission(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let submission = state.submission_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Submission fetched", submission)))
}

#[patch("/api/submissions/{id}/grade")]
async fn grade_submission(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<ManualGradeRequest>,
) -> Result<HttpResponse, AppError> {
    let submission = state
        .submission_service
        .grade(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Submission graded", submission)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_assignment)
        .service(get_submissions_by_assignment)
        .service(get_submissions_by_student)
        .service(grade_submission)
        .service(get_submission);
}

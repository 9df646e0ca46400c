use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{AddResultRequest, PublishResultsRequest, UpdateResultRequest},
    models::dto::response::{ApiResponse, ListResponse},
};

#[post("/api/results")]
async fn add_result(
    state: web::Data<AppState>,
    request: web::Json<AddResultRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state.result_service.add(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Result added", result)))
}

#[post("/api/results/publish")]
async fn publish_results(
    state: web::Data<AppState>,
    request: web::Json<PublishResultsRequest>,
) -> Result<HttpResponse, AppError> {
    let published = state.result_service.publish_exam(&request.exam_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(
        "Results published",
        json!({ "published": published }),
    )))
}

#[get("/api/results/student/{student_id}")]
async fn get_student_results(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let results = state.result_service.all_for_student(&student_id).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Results fetched", results)))
}

#[get("/api/results/student/{student_id}/published")]
async fn get_published_student_results(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let results = state
        .result_service
        .published_for_student(&student_id)
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Results fetched", results)))
}

#[get("/api/results/exam/{exam_id}")]
async fn get_exam_results(
    state: web::Data<AppState>,
    exam_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let results = state.result_service.for_exam(&exam_id).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Results fetched", results)))
}

#[get("/api/results/{id}")]
async fn get_result(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let result = state.result_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Result fetched", result)))
}

#[put("/api/results/{id}")]
async fn update_result(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateResultRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .result_service
        .update(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Result updated", result)))
}

#[delete("/api/results/{id}")]
async fn delete_result(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.result_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Result deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(add_result)
        .service(publish_results)
        .service(get_published_student_results)
        .service(get_student_results)
        .service(get_exam_results)
        .service(get_result)
        .service(update_result)
        .service(delete_result);
}

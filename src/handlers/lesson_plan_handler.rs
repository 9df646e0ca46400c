use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{
        CreateLessonPlanRequest, UpdateLessonPlanRequest, UpdateLessonPlanStatusRequest,
    },
    models::dto::response::{ApiResponse, ListResponse},
};

#[derive(Debug, Deserialize)]
struct LessonPlanListQuery {
    class_id: Option<String>,
    week_number: Option<i32>,
    year: Option<i32>,
}

#[post("/api/lesson-plans")]
async fn create_lesson_plan(
    state: web::Data<AppState>,
    request: web::Json<CreateLessonPlanRequest>,
) -> Result<HttpResponse, AppError> {
    let plan = state.lesson_plan_service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Lesson plan created", plan)))
}

#[get("/api/lesson-plans")]
async fn get_all_lesson_plans(
    state: web::Data<AppState>,
    query: web::Query<LessonPlanListQuery>,
) -> Result<HttpResponse, AppError> {
    let plans = state
        .lesson_plan_service
        .list(query.class_id.as_deref(), query.week_number, query.year)
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Lesson plans fetched", plans)))
}

#[get("/api/lesson-plans/{id}")]
async fn get_lesson_plan(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let plan = state.lesson_plan_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Lesson plan fetched", plan)))
}

#[put("/api/lesson-plans/{id}")]
async fn update_lesson_plan(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateLessonPlanRequest>,
) -> Result<HttpResponse, AppError> {
    let plan = state
        .lesson_plan_service
        .update(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Lesson plan updated", plan)))
}

#[patch("/api/lesson-plans/{id}/status")]
async fn update_lesson_plan_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateLessonPlanStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let plan = state
        .lesson_plan_service
        .set_status(&id, request.status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Lesson plan status updated", plan)))
}

#[delete("/api/lesson-plans/{id}")]
async fn delete_lesson_plan(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.lesson_plan_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Lesson plan deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_lesson_plan)
        .service(get_all_lesson_plans)
        .service(update_lesson_plan_status)
        .service(get_lesson_plan)
        .service(update_lesson_plan)
        .service(delete_lesson_plan);
}

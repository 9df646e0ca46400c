use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{ActivateRequest, CreateClassRequest, UpdateClassRequest},
    models::dto::response::{ApiResponse, ListResponse},
};

#[post("/api/classes")]
async fn create_class(
    state: web::Data<AppState>,
    request: web::Json<CreateClassRequest>,
) -> Result<HttpResponse, AppError> {
    let class = state.class_service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Class created", class)))
}

#[get("/api/classes")]
async fn get_all_classes(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let classes = state.class_service.list().await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Classes fetched", classes)))
}

#[post("/api/classes/sync-counts")]
async fn sync_class_counts(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let report = state.enrollment_service.sync_class_counts().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Class counts synchronized", report)))
}

#[get("/api/classes/{id}")]
async fn get_class(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let class = state.class_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Class fetched", class)))
}

#[get("/api/classes/{id}/students")]
async fn get_enrolled_students(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = state.enrollment_service.enrolled_students(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Enrolled students fetched", response)))
}

#[put("/api/classes/{id}")]
async fn update_class(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateClassRequest>,
) -> Result<HttpResponse, AppError> {
    let class = state
        .class_service
        .update(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Class updated", class)))
}

#[patch("/api/classes/{id}/status")]
async fn set_class_active(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<ActivateRequest>,
) -> Result<HttpResponse, AppError> {
    let class = state
        .class_service
        .set_active(&id, request.is_active)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Class status updated", class)))
}

#[delete("/api/classes/{id}")]
async fn delete_class(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.class_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Class deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_class)
        .service(get_all_classes)
        .service(sync_class_counts)
        .service(get_enrolled_students)
        .service(set_class_active)
        .service(get_class)
        .service(update_class)
        .service(delete_class);
}

use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{
        AddClassHistoryRequest, PromoteStudentsRequest, UpdateApplicationStatusRequest,
        UpdateClassStatusRequest, UpdateProfileRequest, UpdateStudentStatusRequest,
        VerifyStudentRequest,
    },
    models::dto::response::{ApiResponse, ListResponse},
};
use mongodb::bson::oid::ObjectId;
use validator::Validate;

#[get("/api/students")]
async fn get_all_students(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let students = state.student_service.list().await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Students fetched", students)))
}

#[post("/api/students/promote")]
async fn promote_students(
    state: web::Data<AppState>,
    request: web::Json<PromoteStudentsRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    let outcome = state.enrollment_service.promote_students(request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Promotion completed", outcome)))
}

#[get("/api/students/{id}")]
async fn get_student(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let student = state.student_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Student fetched", student)))
}

#[put("/api/students/{id}/profile")]
async fn update_profile(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let student = state
        .student_service
        .update_profile(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Profile updated", student)))
}

#[patch("/api/students/{id}/verify")]
async fn verify_student(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<VerifyStudentRequest>,
) -> Result<HttpResponse, AppError> {
    let student = state
        .student_service
        .set_verified(&id, request.verified)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Verification updated", student)))
}

#[patch("/api/students/{id}/application-status")]
async fn update_application_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateApplicationStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let student = state
        .student_service
        .set_application_status(&id, request.application_status)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Application status updated", student)))
}

#[patch("/api/students/{id}/status")]
async fn update_student_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateStudentStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let student = state.student_service.set_status(&id, request.status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Student status updated", student)))
}

#[patch("/api/students/{id}/class-status")]
async fn update_class_status(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateClassStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    let oid = ObjectId::parse_str(id.as_str())?;
    let student = state
        .enrollment_service
        .update_class_status(&oid, request)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Class history updated", student)))
}

#[post("/api/students/{id}/class-history")]
async fn add_class_history(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<AddClassHistoryRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    let oid = ObjectId::parse_str(id.as_str())?;
    let student = state
        .enrollment_service
        .add_class_history(&oid, request)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Class history entry added", student)))
}

#[delete("/api/students/{id}")]
async fn delete_student(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.student_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Student deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all_students)
        .service(promote_students)
        .service(update_profile)
        .service(verify_student)
        .service(update_application_status)
        .service(update_student_status)
        .service(update_class_status)
        .service(add_class_history)
        .service(get_student)
        .service(delete_student);
}
